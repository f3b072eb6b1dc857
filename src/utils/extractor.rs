//! 路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，处理函数只会拿到合法的正整数 ID。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    match req.match_info().get(param).map(str::parse::<i64>) {
        Some(Ok(id)) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter: {param}");
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

macro_rules! define_id_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_id_extractor!(
    /// `{id}` 路径参数
    SafeIDI64,
    "id"
);
define_id_extractor!(
    /// `{student_id}` 路径参数
    SafeStudentIdI64,
    "student_id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_rejects_zero_negative_and_text() {
        for raw in ["0", "-3", "abc", ""] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw} accepted");
        }
    }

    #[actix_web::test]
    async fn test_named_parameter() {
        let req = TestRequest::default()
            .param("id", "1")
            .param("student_id", "9")
            .to_http_request();
        assert_eq!(SafeStudentIdI64::extract(&req).await.unwrap().0, 9);
    }
}
