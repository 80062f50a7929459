use crate::{
    context::AppContext,
    models::{is_admin, AuthUser, Collection},
    utils::AppError,
};
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use mongodb::bson::doc;
use std::future::{ready, Ready};
use std::rc::Rc;

/// One step of a route's access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Verifies the bearer token and yields the caller's uid
    Authenticate,
    /// Requires the authenticated caller's user record to carry the admin role
    AuthorizeAdmin,
}

/// Per-route access middleware. Only constructible as `user()` or `admin()`,
/// so `AuthorizeAdmin` always runs after `Authenticate`.
#[derive(Clone)]
pub struct Gates {
    gates: Rc<[Gate]>,
}

impl Gates {
    pub fn user() -> Self {
        Self {
            gates: Rc::from([Gate::Authenticate]),
        }
    }

    pub fn admin() -> Self {
        Self {
            gates: Rc::from([Gate::Authenticate, Gate::AuthorizeAdmin]),
        }
    }

    #[cfg(test)]
    pub fn chain(&self) -> &[Gate] {
        &self.gates
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let mut parts = header.ok_or(AppError::Unauthorized)?.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AppError::Unauthorized),
    }
}

async fn authenticate(ctx: &AppContext, authorization: Option<&str>) -> Result<AuthUser, AppError> {
    let token = bearer_token(authorization)?;
    let uid = ctx.verifier.verify(token).await?;
    Ok(AuthUser { uid })
}

async fn authorize_admin(ctx: &AppContext, user: &AuthUser) -> Result<(), AppError> {
    let record = ctx
        .store
        .find_one(Collection::Users, doc! { "uid": &user.uid })
        .await?;

    if !is_admin(record.as_ref()) {
        log::warn!("⛔ {} is not an admin", user.uid);
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Runs a gate chain in order. Each gate either enriches the principal and
/// continues, or short-circuits with the error that becomes the response.
pub async fn run_gates(
    ctx: &AppContext,
    gates: &[Gate],
    authorization: Option<&str>,
) -> Result<Option<AuthUser>, AppError> {
    let mut principal: Option<AuthUser> = None;

    for gate in gates {
        match gate {
            Gate::Authenticate => {
                principal = Some(authenticate(ctx, authorization).await?);
            }
            Gate::AuthorizeAdmin => {
                let user = principal.as_ref().ok_or(AppError::Forbidden)?;
                authorize_admin(ctx, user).await?;
            }
        }
    }

    Ok(principal)
}

impl<S, B> Transform<S, ServiceRequest> for Gates
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = GatesMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GatesMiddleware {
            service: Rc::new(service),
            gates: self.gates.clone(),
        }))
    }
}

pub struct GatesMiddleware<S> {
    service: Rc<S>,
    gates: Rc<[Gate]>,
}

impl<S, B> Service<ServiceRequest> for GatesMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let gates = self.gates.clone();

        Box::pin(async move {
            let Some(ctx) = req.app_data::<web::Data<AppContext>>().cloned() else {
                let err = AppError::ConfigError("application context not registered".to_string());
                return Ok(req.error_response(err).map_into_right_body());
            };

            let authorization = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            match run_gates(&ctx, &gates, authorization.as_deref()).await {
                Ok(principal) => {
                    if let Some(user) = principal {
                        req.extensions_mut().insert(user);
                    }
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), err);
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}
