//! In-memory identity provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use kisan_core::models::{Session, SignInRequest, SignUpRequest, UserContext};
use uuid::Uuid;
use validator::Validate;

use crate::identity::{IdentityError, IdentityGate, SignUpOutcome};

#[derive(Clone)]
struct Account {
    user: UserContext,
    password: String,
    confirmed: bool,
}

#[derive(Clone, Default)]
pub struct MockIdentityGate {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    session: Arc<Mutex<Option<Session>>>,
    otp_requests: Arc<Mutex<Vec<String>>>,
}

impl MockIdentityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate with `user` already signed in.
    pub fn signed_in(user: UserContext) -> Self {
        let gate = Self::new();
        *gate.session.lock().unwrap() = Some(Session {
            user,
            email_confirmed_at: Some(Utc::now()),
            expires_at: None,
        });
        gate
    }

    pub fn add_confirmed_user(&self, user: UserContext, password: &str) {
        let email = user.email.clone().unwrap_or_default();
        self.accounts.lock().unwrap().insert(
            email,
            Account {
                user,
                password: password.to_string(),
                confirmed: true,
            },
        );
    }

    pub fn confirm_email(&self, email: &str) {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(email) {
            account.confirmed = true;
        }
    }

    /// Destinations passed to `request_otp`, in order.
    pub fn otp_requests(&self) -> Vec<String> {
        self.otp_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityGate for MockIdentityGate {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, IdentityError> {
        request.validate()?;
        let metadata = request.metadata();

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&request.email) {
            return Err(IdentityError::Provider("User already registered".to_string()));
        }

        let user = UserContext {
            user_id: Uuid::new_v4(),
            display_name: Some(metadata.full_name),
            email: Some(request.email.clone()),
            phone: metadata.phone,
        };
        accounts.insert(
            request.email.clone(),
            Account {
                user,
                password: request.password.clone(),
                confirmed: false,
            },
        );
        Ok(SignUpOutcome::PendingVerification)
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<Session, IdentityError> {
        request.validate()?;

        let account = self
            .accounts
            .lock()
            .unwrap()
            .get(&request.email)
            .cloned()
            .ok_or(IdentityError::InvalidCredentials)?;

        if account.password != request.password {
            return Err(IdentityError::InvalidCredentials);
        }
        if !account.confirmed {
            return Err(IdentityError::EmailNotVerified);
        }

        let session = Session {
            user: account.user,
            email_confirmed_at: Some(Utc::now()),
            expires_at: None,
        };
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn request_otp(&self, destination: &str) -> Result<(), IdentityError> {
        self.otp_requests
            .lock()
            .unwrap()
            .push(destination.to_string());
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Session>, IdentityError> {
        Ok(self.session.lock().unwrap().clone())
    }
}
