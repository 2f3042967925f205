use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::models::Role;
use crate::utils::AppError;

/// Header carrying the caller's role. Trusted as-is; there is no authentication.
pub const ROLE_HEADER: &str = "X-User-Role";

/// Rejects requests whose `X-User-Role` is missing or not in the allow-list.
///
/// On success the parsed [`Role`] is stored in the request extensions.
#[derive(Debug, Clone)]
pub struct RequireRole {
    allowed: Vec<Role>,
}

impl RequireRole {
    pub fn new(allowed: &[Role]) -> Self {
        Self { allowed: allowed.to_vec() }
    }

    pub fn citizen() -> Self {
        Self::new(&[Role::Citizen])
    }

    pub fn officer() -> Self {
        Self::new(&[Role::Officer])
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service,
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: S,
    allowed: Vec<Role>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let role = req
            .headers()
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Role>().ok());

        match role {
            Some(role) if self.allowed.contains(&role) => {
                req.extensions_mut().insert(role);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            _ => {
                log::warn!(
                    "🚫 {} {} - role {:?} not allowed",
                    req.method(),
                    req.path(),
                    req.headers().get(ROLE_HEADER)
                );
                let response = AppError::InsufficientRole(self.allowed.clone()).error_response();
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
