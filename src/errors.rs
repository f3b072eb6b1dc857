//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_schoolsys_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolSysError {
            $($variant(String),)*
        }

        impl SchoolSysError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolSysError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolSysError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolSysError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolSysError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolSysError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schoolsys_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Scheduling("E014", "Scheduling Error"),
}

impl SchoolSysError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为唯一约束冲突（SQLite / PostgreSQL / MySQL 的报错文本各不相同）
    pub fn is_unique_violation(&self) -> bool {
        let msg = self.message();
        matches!(self, SchoolSysError::Conflict(_))
            || msg.contains("UNIQUE constraint failed")
            || msg.contains("duplicate key value")
            || msg.contains("Duplicate entry")
    }

    /// 是否为外键约束失败
    pub fn is_foreign_key_violation(&self) -> bool {
        let msg = self.message();
        msg.contains("FOREIGN KEY constraint failed")
            || msg.contains("violates foreign key constraint")
            || msg.contains("a foreign key constraint fails")
    }
}

impl fmt::Display for SchoolSysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolSysError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolSysError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolSysError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SchoolSysError {
    fn from(err: std::io::Error) -> Self {
        SchoolSysError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolSysError {
    fn from(err: serde_json::Error) -> Self {
        SchoolSysError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolSysError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolSysError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolSysError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolSysError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolSysError::database_config("test").code(), "E003");
        assert_eq!(SchoolSysError::validation("test").code(), "E007");
        assert_eq!(SchoolSysError::authentication("test").code(), "E012");
        assert_eq!(SchoolSysError::scheduling("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolSysError::conflict("test").error_type(),
            "Resource Conflict"
        );
        assert_eq!(
            SchoolSysError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolSysError::validation("end_year must be after start_year");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("end_year"));
    }

    #[test]
    fn test_constraint_detection() {
        let sqlite = SchoolSysError::database_operation(
            "创建批次失败: UNIQUE constraint failed: batches.batch_code",
        );
        assert!(sqlite.is_unique_violation());
        assert!(!sqlite.is_foreign_key_violation());

        let postgres = SchoolSysError::database_operation(
            "insert or update on table \"students\" violates foreign key constraint",
        );
        assert!(postgres.is_foreign_key_violation());
        assert!(SchoolSysError::conflict("slot taken").is_unique_violation());
    }
}
