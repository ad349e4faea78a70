//! Account sessions on top of the cookie session store.
//!
//! The cookie holds nothing but the logged-in user's numeric id. Handlers
//! extract [`SessionContext`] instead of the raw actix session.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record a successful login. The session is renewed first so a cookie
    /// issued before login cannot be reused afterwards.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0.insert(USER_ID_KEY, user_id.get()).map_err(|err| {
            Error::internal(format!("failed to store user {user_id} in session: {err}"))
        })
    }

    /// Logged-in user, if any. An undecodable value is dropped.
    pub fn user_id(&self) -> Option<UserId> {
        self.0
            .get::<i32>(USER_ID_KEY)
            .unwrap_or_else(|err| {
                warn!(error = %err, "dropping unreadable session user id");
                self.0.remove(USER_ID_KEY);
                None
            })
            .map(UserId::new)
    }

    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Forget the user and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(Self::new) })
    }
}
