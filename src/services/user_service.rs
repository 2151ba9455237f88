//! User service for registration, profile management, invitations and admin operations.

use std::sync::Arc;

use log::{debug, error, info, warn};
use mongodb::bson::oid::ObjectId;

use crate::config::CONFIG;
use crate::constants::{
    CODE_ADMIN_REQUIRED, CODE_EMAIL_EXISTS, CODE_FORBIDDEN, CODE_INVALID_CREDENTIALS,
    CODE_INVALID_VERIFICATION_TOKEN, CODE_NICKNAME_EXISTS, CODE_SELF_ACTION_FORBIDDEN,
    CODE_USER_HAS_INVITEES, CODE_USER_NOT_FOUND, CODE_WRONG_PASSWORD, ERR_CANNOT_DEMOTE_SELF,
    ERR_EMAIL_EXISTS, ERR_INVALID_INVITATION_TOKEN, ERR_INVALID_VERIFICATION_TOKEN,
    ERR_NICKNAME_EXISTS, ERR_NO_PASSWORD_SET, ERR_ONLY_ADMINS_ROLES, ERR_USER_HAS_INVITEES,
    ERR_USER_NOT_FOUND, ERR_VERIFIED_EMAIL_TO_INVITE, ERR_WRONG_PASSWORD,
};
use crate::errors::ApiError;
use crate::models::{
    AcceptInvitationRequest, ChangePasswordRequest, InvitationResponse, PageRequest,
    RegisterRequest, Role, SearchCriteria, UpdateUserRequest, User, UserFilter, UserSort,
    UserStats,
};
use crate::repositories::UserRepository;
use crate::services::auth_service::{hash_password, verify_password};
use crate::services::email_service::{EmailKind, Mailer, OutgoingEmail};
use crate::utils::log_sanitizer::{mask_email, mask_nickname};
use crate::utils::tokens::{generate_nickname, generate_verification_token};
use crate::validators::{validate_password_different, validate_password_match};

const NICKNAME_ATTEMPTS: usize = 10;

fn user_not_found() -> ApiError {
    ApiError::not_found(CODE_USER_NOT_FOUND, ERR_USER_NOT_FOUND)
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    base_url: String,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            users,
            mailer,
            base_url: CONFIG.server_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Register a new account.
    ///
    /// The very first account becomes a verified `ADMIN`. Everyone else starts
    /// as `ANONYMOUS` and receives a verification link.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, ApiError> {
        self.ensure_email_free(&req.email).await?;
        let nickname = match req.nickname {
            Some(nickname) => {
                self.ensure_nickname_free(&nickname, None).await?;
                nickname
            }
            None => self.unique_nickname().await?,
        };

        let first_user = self.users.count(&UserFilter::default()).await? == 0;
        let role = if first_user { Role::Admin } else { Role::Anonymous };

        let mut user = User::new(nickname, &req.email, role);
        user.password_hash = Some(hash_password(&req.password)?);
        user.profile.first_name = req.first_name;
        user.profile.last_name = req.last_name;
        if first_user {
            user.email_verified = true;
        } else {
            user.verification_token = Some(generate_verification_token());
        }

        self.users.insert(&user).await?;
        info!(
            "Registered user {} ({}) as {}",
            user.id,
            mask_nickname(&user.nickname),
            user.role
        );

        if let Some(token) = &user.verification_token {
            let link = format!(
                "{}/api/auth/verify-email/{}/{}",
                self.base_url,
                user.id.to_hex(),
                token
            );
            self.notify(EmailKind::Verification, &user.email, link).await;
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: ObjectId) -> Result<User, ApiError> {
        debug!("Fetching user by ID: {}", id);
        self.users.find_by_id(id).await?.ok_or_else(|| {
            warn!("User not found with id: {}", id);
            user_not_found()
        })
    }

    /// Apply a profile update. Only fields present in the request change.
    pub async fn update_user(&self, id: ObjectId, req: UpdateUserRequest) -> Result<User, ApiError> {
        let mut user = self.get_user(id).await?;

        if let Some(email) = req.email {
            let email = email.trim().to_lowercase();
            if email != user.email {
                self.ensure_email_free(&email).await?;
                user.email = email;
            }
        }
        if let Some(nickname) = req.nickname {
            if nickname != user.nickname {
                self.ensure_nickname_free(&nickname, Some(id)).await?;
                user.nickname = nickname;
            }
        }

        let profile = &mut user.profile;
        let fields = [
            (&mut profile.first_name, req.first_name),
            (&mut profile.last_name, req.last_name),
            (&mut profile.bio, req.bio),
            (&mut profile.profile_picture_url, req.profile_picture_url),
            (&mut profile.linkedin_profile_url, req.linkedin_profile_url),
            (&mut profile.github_profile_url, req.github_profile_url),
        ];
        for (slot, value) in fields {
            if value.is_some() {
                *slot = value;
            }
        }

        user.touch();
        self.save(&user).await?;
        info!("Updated profile of user {}", id);
        Ok(user)
    }

    /// Delete an account. Refused with 409 while other users still point at
    /// it through `invited_by_user_id`.
    pub async fn delete_user(&self, id: ObjectId) -> Result<(), ApiError> {
        let invitees = self.users.count(&UserFilter::invitees_of(id)).await?;
        if invitees > 0 {
            warn!("Delete refused: user {} invited {} other account(s)", id, invitees);
            return Err(ApiError::conflict(CODE_USER_HAS_INVITEES, ERR_USER_HAS_INVITEES));
        }
        if !self.users.delete(id).await? {
            warn!("Delete failed: user not found with id: {}", id);
            return Err(user_not_found());
        }
        info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn change_password(
        &self,
        id: ObjectId,
        req: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        validate_password_match(&req.new_password, &req.confirm_password)?;
        validate_password_different(&req.current_password, &req.new_password)?;

        let mut user = self.get_user(id).await?;
        let stored = user
            .password_hash
            .as_deref()
            .ok_or_else(|| ApiError::bad_request(CODE_INVALID_CREDENTIALS, ERR_NO_PASSWORD_SET))?;

        if !verify_password(&req.current_password, stored)? {
            warn!("Password change failed: wrong current password for user {}", id);
            return Err(ApiError::bad_request(CODE_WRONG_PASSWORD, ERR_WRONG_PASSWORD));
        }

        user.password_hash = Some(hash_password(&req.new_password)?);
        user.touch();
        self.save(&user).await?;
        info!("Password changed for user {}", id);
        Ok(())
    }

    /// Consume a verification token. Anonymous users become authenticated.
    pub async fn verify_email(&self, id: ObjectId, token: &str) -> Result<User, ApiError> {
        let mut user = self.get_user(id).await?;

        if user.verification_token.as_deref() != Some(token) || user.is_pending_invitation() {
            warn!("Email verification failed for user {}: token mismatch", id);
            return Err(ApiError::bad_request(
                CODE_INVALID_VERIFICATION_TOKEN,
                ERR_INVALID_VERIFICATION_TOKEN,
            ));
        }

        user.verify_email();
        self.save(&user).await?;
        info!("Email verified for user {} (role {})", id, user.role);
        Ok(user)
    }

    /// Create a placeholder account for `email` on behalf of `inviter`.
    pub async fn invite(&self, inviter: ObjectId, email: &str) -> Result<InvitationResponse, ApiError> {
        let inviter = self.get_user(inviter).await?;
        if !inviter.email_verified {
            warn!("Unverified user {} attempted to send an invitation", inviter.id);
            return Err(ApiError::forbidden(CODE_FORBIDDEN, ERR_VERIFIED_EMAIL_TO_INVITE));
        }

        self.ensure_email_free(email).await?;

        let token = generate_verification_token();
        let mut invitee = User::new(self.unique_nickname().await?, email, Role::Anonymous);
        invitee.invited_by_user_id = Some(inviter.id);
        invitee.verification_token = Some(token.clone());
        self.users.insert(&invitee).await?;

        let link = format!("{}/register?token={}", self.base_url, token);
        info!(
            "User {} invited {} as {}",
            inviter.id,
            mask_email(&invitee.email),
            invitee.id
        );
        self.notify(EmailKind::Invitation, &invitee.email, link.clone())
            .await;

        Ok(InvitationResponse {
            user_id: invitee.id.to_hex(),
            email: invitee.email,
            invitation_link: link,
        })
    }

    /// Complete an invited account: password set, email verified, converted.
    pub async fn accept_invitation(&self, req: AcceptInvitationRequest) -> Result<User, ApiError> {
        let invalid = || {
            ApiError::bad_request(CODE_INVALID_VERIFICATION_TOKEN, ERR_INVALID_INVITATION_TOKEN)
        };

        let mut user = self
            .users
            .find_by_verification_token(&req.token)
            .await?
            .ok_or_else(invalid)?;
        if !user.is_pending_invitation() {
            warn!("Invitation token presented for non-invited user {}", user.id);
            return Err(invalid());
        }

        if let Some(nickname) = req.nickname {
            if nickname != user.nickname {
                self.ensure_nickname_free(&nickname, Some(user.id)).await?;
                user.nickname = nickname;
            }
        }

        user.password_hash = Some(hash_password(&req.password)?);
        user.verify_email();
        user.is_converted = true;
        self.save(&user).await?;

        info!(
            "Invited user {} completed registration (invited by {:?})",
            user.id, user.invited_by_user_id
        );
        Ok(user)
    }

    /// Change a user's role. Only administrators may do this; every denied
    /// attempt is written to the log with actor and target.
    pub async fn update_role(
        &self,
        actor_id: ObjectId,
        target_id: ObjectId,
        role: Role,
    ) -> Result<User, ApiError> {
        let actor = self.users.find_by_id(actor_id).await?;
        let actor_role = actor.as_ref().map(|a| a.role);
        if !matches!(actor_role, Some(Role::Admin)) {
            warn!(
                "Denied role change: user {} (role {:?}) attempted to set role of user {} to {}",
                actor_id, actor_role, target_id, role
            );
            return Err(ApiError::forbidden(CODE_ADMIN_REQUIRED, ERR_ONLY_ADMINS_ROLES));
        }

        if actor_id == target_id && role != Role::Admin {
            warn!("Admin {} attempted to demote themselves to {}", actor_id, role);
            return Err(ApiError::forbidden(
                CODE_SELF_ACTION_FORBIDDEN,
                ERR_CANNOT_DEMOTE_SELF,
            ));
        }

        let mut user = self.get_user(target_id).await?;
        let previous = user.role;
        user.role = role;
        user.touch();
        self.save(&user).await?;

        info!(
            "Admin {} changed role of user {} from {} to {}",
            actor_id, target_id, previous, role
        );
        Ok(user)
    }

    /// Set a new password on behalf of the user. Also clears the lockout, so a
    /// locked account can sign in again straight away.
    pub async fn reset_password(&self, id: ObjectId, new_password: &str) -> Result<User, ApiError> {
        let mut user = self.get_user(id).await?;
        user.password_hash = Some(hash_password(new_password)?);
        user.unlock_account();
        self.save(&user).await?;
        info!("Password reset for user {}", id);
        Ok(user)
    }

    pub async fn lock_user(&self, id: ObjectId) -> Result<User, ApiError> {
        let mut user = self.get_user(id).await?;
        user.lock_account();
        self.save(&user).await?;
        info!("Locked account {}", id);
        Ok(user)
    }

    pub async fn unlock_user(&self, id: ObjectId) -> Result<User, ApiError> {
        let mut user = self.get_user(id).await?;
        user.unlock_account();
        self.save(&user).await?;
        info!("Unlocked account {}", id);
        Ok(user)
    }

    pub async fn update_professional_status(
        &self,
        id: ObjectId,
        is_professional: bool,
    ) -> Result<User, ApiError> {
        let mut user = self.get_user(id).await?;
        user.update_professional_status(is_professional);
        self.save(&user).await?;
        info!("Professional status of user {} set to {}", id, is_professional);
        Ok(user)
    }

    /// Newest accounts first.
    pub async fn list_users(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        self.search_users(&SearchCriteria {
            filter: UserFilter::default(),
            sort: UserSort::default(),
            page,
        })
        .await
    }

    /// One page of matching users plus the total number of matches.
    pub async fn search_users(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<(Vec<User>, u64), ApiError> {
        debug!("Searching users with {:?}", criteria);
        let total = self.users.count(&criteria.filter).await?;
        if total == 0 || criteria.page.skip() >= total {
            return Ok((Vec::new(), total));
        }
        let users = self
            .users
            .search(&criteria.filter, criteria.sort, criteria.page)
            .await?;
        Ok((users, total))
    }

    pub async fn get_stats(&self) -> Result<UserStats, ApiError> {
        let count = |filter: UserFilter| async move { self.users.count(&filter).await };

        Ok(UserStats {
            total_users: count(UserFilter::default()).await?,
            anonymous_users: count(UserFilter::with_role(Role::Anonymous)).await?,
            authenticated_users: count(UserFilter::with_role(Role::Authenticated)).await?,
            manager_users: count(UserFilter::with_role(Role::Manager)).await?,
            admin_users: count(UserFilter::with_role(Role::Admin)).await?,
            locked_users: count(UserFilter {
                is_locked: Some(true),
                ..Default::default()
            })
            .await?,
            verified_users: count(UserFilter {
                email_verified: Some(true),
                ..Default::default()
            })
            .await?,
            invited_users: count(UserFilter {
                invited: Some(true),
                ..Default::default()
            })
            .await?,
            converted_users: count(UserFilter {
                invited: Some(true),
                is_converted: Some(true),
                ..Default::default()
            })
            .await?,
        })
    }

    async fn save(&self, user: &User) -> Result<(), ApiError> {
        if self.users.replace(user).await? {
            Ok(())
        } else {
            Err(user_not_found())
        }
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), ApiError> {
        if self.users.find_by_email(email).await?.is_some() {
            warn!("Email {} is already registered", mask_email(email));
            return Err(ApiError::conflict(CODE_EMAIL_EXISTS, ERR_EMAIL_EXISTS));
        }
        Ok(())
    }

    async fn ensure_nickname_free(
        &self,
        nickname: &str,
        owner: Option<ObjectId>,
    ) -> Result<(), ApiError> {
        match self.users.find_by_nickname(nickname).await? {
            Some(existing) if Some(existing.id) != owner => {
                warn!("Nickname {} is already taken", mask_nickname(nickname));
                Err(ApiError::conflict(CODE_NICKNAME_EXISTS, ERR_NICKNAME_EXISTS))
            }
            _ => Ok(()),
        }
    }

    async fn unique_nickname(&self) -> Result<String, ApiError> {
        for _ in 0..NICKNAME_ATTEMPTS {
            let candidate = generate_nickname();
            if self.users.find_by_nickname(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(ApiError::internal("could not generate a unique nickname"))
    }

    /// Delivery failures are logged; they never undo the account change.
    async fn notify(&self, kind: EmailKind, to: &str, link: String) {
        let email = OutgoingEmail {
            kind,
            to: to.to_string(),
            link,
        };
        if let Err(e) = self.mailer.send(email).await {
            error!("Failed to send {:?} email to {}: {}", kind, mask_email(to), e);
        }
    }
}
