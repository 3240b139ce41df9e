use std::path::PathBuf;
use std::sync::Arc;

use mochila_application::{
    InteractionLedger, MemberQueryService, ProfileService, VerificationService,
};
use mochila_core::interaction::InteractionRepository;
use mochila_core::mail::VerificationMailer;
use mochila_core::member::PhotoUrlResolver;
use mochila_core::photo::PhotoStorage;
use mochila_core::user::UserRepository;
use mochila_infrastructure::config::ServerSettings;

/// Services and settings shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub profile_service: Arc<ProfileService>,
    pub member_service: Arc<MemberQueryService>,
    pub interaction_ledger: Arc<InteractionLedger>,
    pub verification_service: Arc<VerificationService>,
    pub resolver: PhotoUrlResolver,
    pub expose_error_details: bool,
    pub frontend_url: Option<String>,
    /// Directory served under `/uploads`.
    pub upload_dir: PathBuf,
}

impl AppState {
    /// Wires the use cases over the given ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        interactions: Arc<dyn InteractionRepository>,
        photos: Arc<dyn PhotoStorage>,
        mailer: Arc<dyn VerificationMailer>,
        server: &ServerSettings,
        upload_dir: PathBuf,
    ) -> Self {
        let resolver = PhotoUrlResolver::new(server.api_base_url.clone());

        let interaction_ledger = Arc::new(InteractionLedger::new(
            users.clone(),
            interactions,
            resolver.clone(),
        ));
        let member_service = Arc::new(MemberQueryService::new(
            users.clone(),
            interaction_ledger.clone(),
            resolver.clone(),
        ));

        Self {
            profile_service: Arc::new(ProfileService::new(users, photos)),
            member_service,
            interaction_ledger,
            verification_service: Arc::new(VerificationService::new(mailer)),
            resolver,
            expose_error_details: server.expose_error_details,
            frontend_url: server.frontend_url.clone(),
            upload_dir,
        }
    }
}
