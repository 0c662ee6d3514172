use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use std::future::{ready, Future, Ready};
use std::pin::Pin;

use super::jwt::{JwtUtils, TokenVerifyResult, ACCESS_TOKEN_COOKIE};
use crate::model::global_error::{AppError, ErrorCode};

/// Bearer 토큰(또는 accessToken 쿠키)을 검증하고 사용자 ID(i32)를 요청 확장에 넣는다.
pub struct AuthMiddleware;

// 미들웨어 팩토리
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(user_id) => {
                req.extensions_mut().insert(user_id);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}

fn authenticate(req: &ServiceRequest) -> Result<i32, AppError> {
    let jwt = req
        .app_data::<web::Data<JwtUtils>>()
        .ok_or_else(|| AppError::with_detail(ErrorCode::InternalError, "JwtUtils is not registered"))?;

    let token = bearer_token(req)
        .or_else(|| req.cookie(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string()))
        .ok_or_else(|| AppError::new(ErrorCode::AuthenticationFailed))?;

    match jwt.verify_token(&token) {
        TokenVerifyResult::Valid(claims) => claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::new(ErrorCode::InvalidAuthToken)),
        TokenVerifyResult::Expired => Err(AppError::new(ErrorCode::ExpiredAuthToken)),
        TokenVerifyResult::Invalid => Err(AppError::new(ErrorCode::InvalidAuthToken)),
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_string)
}
