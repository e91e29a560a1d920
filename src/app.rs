//! Composition root.
//! `AppContext` owns the configuration, durable prefs, HTTP client, session
//! store, role resolver, query cache, mutation controller and notifier, and
//! exposes the domain operations pages drive. Initialization reads the
//! persisted token and theme; `sign_out` is the teardown path. There are no
//! module-level singletons.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api;
use crate::api::{DeleteResult, InsertResult, UpdateResult};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::http::{new_token_slot, RestClient, TokenSlot};
use crate::identity::{IdentityProvider, RoleResolver, SessionStore};
use crate::model::{
    AdoptionRequest, DonationCampaign, NewAdoptionRequest, NewCampaign, NewPet, Pet, RequestStatus,
};
use crate::notify::{NoticeLevel, Notifier};
use crate::payments::{DonationFlow, HttpPaymentGateway, HttpPaymentsBackend, PaymentGateway};
use crate::prefs::{PrefsStore, Theme};
use crate::query::{
    CacheObserver, DetailQuery, MutationController, MutationOutcome, PagedList, QueryCache,
};
use crate::routes::{NavState, RouteDecision, RouteTable};
use crate::validate::ADOPTION_SCHEMA;

pub struct AppContext {
    config: AppConfig,
    prefs: PrefsStore,
    token: TokenSlot,
    backend: RestClient,
    session: Arc<SessionStore>,
    roles: Arc<RoleResolver>,
    cache: QueryCache,
    mutations: MutationController,
    notifier: Arc<Notifier>,
    routes: RouteTable,
    theme: RwLock<Theme>,
}

impl AppContext {
    /// Install the tracing subscriber the way the rest of the stack expects
    /// (`RUST_LOG`-driven, "info" fallback). Safe to call more than once.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .unwrap();
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Build and initialize the engine: read persisted token/theme, restore
    /// the session, wire the role cache to users invalidations.
    pub fn bootstrap(
        config: AppConfig,
        provider: Arc<dyn IdentityProvider>,
    ) -> AppResult<Arc<Self>> {
        let prefs = PrefsStore::new(&config.data_dir)?;
        let token = new_token_slot();
        let backend = RestClient::new(&config.api_url, token.clone())?;
        let notifier = Arc::new(Notifier::new());
        let cache = QueryCache::new();
        let mutations = MutationController::new(cache.clone(), notifier.clone());

        let session = Arc::new(SessionStore::new(
            backend.clone(),
            token.clone(),
            prefs.clone(),
            provider,
        ));
        let had_stored = prefs.load_session().is_some();
        session.restore();
        if had_stored && !session.is_signed_in() {
            notifier.push_once(
                "session-expired",
                NoticeLevel::Warning,
                "Your session has expired, please sign in again.",
            );
        }

        let roles = Arc::new(RoleResolver::new(backend.clone()));
        // The weak observer shares the resolver's allocation, so it stays
        // live for as long as the context holds the resolver
        let roles_observer: Arc<dyn CacheObserver> = roles.clone();
        cache.subscribe("users", Arc::downgrade(&roles_observer));

        let theme = prefs.load_theme();
        info!(
            target: "pawhaven",
            "engine up: api='{}', signed_in={}, theme={:?}",
            config.api_url,
            session.is_signed_in(),
            theme
        );

        Ok(Arc::new(Self {
            config,
            prefs,
            token,
            backend,
            session,
            roles,
            cache,
            mutations,
            notifier,
            routes: RouteTable::platform(),
            theme: RwLock::new(theme),
        }))
    }

    pub fn config(&self) -> &AppConfig { &self.config }
    pub fn backend(&self) -> &RestClient { &self.backend }
    pub fn token_slot(&self) -> TokenSlot { self.token.clone() }
    pub fn session(&self) -> &SessionStore { &self.session }
    pub fn roles(&self) -> &RoleResolver { &self.roles }
    pub fn cache(&self) -> &QueryCache { &self.cache }
    pub fn mutations(&self) -> &MutationController { &self.mutations }
    pub fn notifier(&self) -> &Arc<Notifier> { &self.notifier }
    pub fn routes(&self) -> &RouteTable { &self.routes }

    pub fn theme(&self) -> Theme {
        *self.theme.read()
    }

    pub fn set_theme(&self, theme: Theme) -> AppResult<()> {
        *self.theme.write() = theme;
        self.prefs.save_theme(theme)
    }

    /// Teardown: clear the session (token first) and forget cached roles.
    pub async fn sign_out(&self) -> AppResult<()> {
        let result = self.session.sign_out().await;
        self.roles.clear();
        result
    }

    /// Evaluate the guards for a path, resolving the admin role on demand.
    /// Pushes the forbidden notice when the decision carries one.
    pub async fn resolve_route(&self, path: &str, nav: &NavState) -> RouteDecision {
        let mut admin = self.session.principal().and_then(|p| self.roles.cached_is_admin(&p.email));
        let mut decision = self.routes.resolve(path, &self.session.state(), admin, nav);

        if decision == RouteDecision::Pending {
            if let Some(principal) = self.session.principal() {
                // Role resolution is the only pending input once signed in
                admin = self.roles.resolve_is_admin(&principal.email).await.ok();
                decision = self.routes.resolve(path, &self.session.state(), admin, nav);
            }
        }

        if let RouteDecision::RedirectToDashboard { forbidden_notice: true } = &decision {
            self.notifier.push(
                NoticeLevel::Warning,
                "You do not have permission to view this page. Redirecting to your dashboard.",
            );
        }
        decision
    }

    // --- Catalog views -----------------------------------------------------

    /// The public pet listing, subscribed under "pets".
    pub fn pet_listing(&self) -> PagedList<Pet> {
        let list = api::pets::listing(self.backend.clone());
        list.subscribe_to(&self.cache, "pets");
        list
    }

    /// The campaign marketplace, subscribed under "donations".
    pub fn campaign_listing(&self) -> PagedList<DonationCampaign> {
        let list = api::campaigns::listing(self.backend.clone());
        list.subscribe_to(&self.cache, "donations");
        list
    }

    pub fn pet_detail(&self, id: &str) -> DetailQuery<Pet> {
        let detail = api::pets::detail(self.backend.clone(), id.to_string());
        detail.subscribe_to(&self.cache, &format!("pets/{}", id));
        detail
    }

    pub fn campaign_detail(&self, id: &str) -> DetailQuery<DonationCampaign> {
        let detail = api::campaigns::detail(self.backend.clone(), id.to_string());
        detail.subscribe_to(&self.cache, &format!("donations/{}", id));
        detail
    }

    // --- Pet mutations -----------------------------------------------------

    pub async fn create_pet(&self, pet: &NewPet) -> AppResult<MutationOutcome<InsertResult>> {
        self.mutations
            .run("create-pet", &["pets"], api::pets::create(&self.backend, pet))
            .await
    }

    pub async fn update_pet(
        &self,
        id: &str,
        pet: &NewPet,
    ) -> AppResult<MutationOutcome<UpdateResult>> {
        self.mutations
            .run(&format!("update-pet-{}", id), &["pets"], api::pets::update(&self.backend, id, pet))
            .await
    }

    pub async fn delete_pet(&self, id: &str) -> AppResult<MutationOutcome<DeleteResult>> {
        self.mutations
            .run(&format!("delete-pet-{}", id), &["pets"], api::pets::delete(&self.backend, id))
            .await
    }

    pub async fn set_pet_adopted(
        &self,
        id: &str,
        adopted: bool,
    ) -> AppResult<MutationOutcome<UpdateResult>> {
        self.mutations
            .run(
                &format!("adopt-pet-{}", id),
                &["pets"],
                api::pets::set_adopted(&self.backend, id, adopted),
            )
            .await
    }

    // --- Campaign mutations ------------------------------------------------

    pub async fn create_campaign(
        &self,
        campaign: &NewCampaign,
    ) -> AppResult<MutationOutcome<InsertResult>> {
        self.mutations
            .run("create-campaign", &["donations"], api::campaigns::create(&self.backend, campaign))
            .await
    }

    pub async fn update_campaign(
        &self,
        id: &str,
        campaign: &NewCampaign,
    ) -> AppResult<MutationOutcome<UpdateResult>> {
        self.mutations
            .run(
                &format!("update-campaign-{}", id),
                &["donations"],
                api::campaigns::update(&self.backend, id, campaign),
            )
            .await
    }

    pub async fn set_campaign_paused(
        &self,
        id: &str,
        paused: bool,
    ) -> AppResult<MutationOutcome<UpdateResult>> {
        self.mutations
            .run(
                &format!("pause-campaign-{}", id),
                &["donations"],
                api::campaigns::set_paused(&self.backend, id, paused),
            )
            .await
    }

    pub async fn admin_delete_campaign(&self, id: &str) -> AppResult<MutationOutcome<DeleteResult>> {
        self.mutations
            .run(
                &format!("delete-campaign-{}", id),
                &["donations"],
                api::campaigns::admin_delete(&self.backend, id),
            )
            .await
    }

    // --- Adoption requests -------------------------------------------------

    /// Submit an adoption request for a pet. Guarded client-side: requires a
    /// session, refuses the requester's own pet and already-adopted pets, and
    /// validates the contact form before any network call.
    pub async fn submit_adoption_request(
        &self,
        pet: &Pet,
        phone: &str,
        address: &str,
    ) -> AppResult<MutationOutcome<InsertResult>> {
        let Some(principal) = self.session.principal() else {
            return Err(AppError::auth("login_required", "Please log in to adopt a pet."));
        };
        if pet.owner_email == principal.email {
            return Err(AppError::validation("own_pet", "You can't adopt your own pet!"));
        }
        if pet.adopted {
            return Err(AppError::validation(
                "already_adopted",
                "This pet has already been adopted.",
            ));
        }
        let mut values = HashMap::new();
        values.insert("phoneNumber", phone);
        values.insert("address", address);
        ADOPTION_SCHEMA.validate_as_app_error(&values)?;

        let request = NewAdoptionRequest {
            user_name: principal.name.clone(),
            user_email: principal.email.clone(),
            user_phone: phone.to_string(),
            user_address: address.to_string(),
            pet_id: pet.id.clone(),
            pet_name: pet.pet_name.clone(),
            pet_image: pet.pet_image.clone(),
            pet_owner_email: pet.owner_email.clone(),
            status: RequestStatus::Pending,
        };
        self.mutations
            .run(
                &format!("adopt-request-{}", pet.id),
                &["adoptions"],
                api::adoptions::create(&self.backend, &request),
            )
            .await
    }

    /// Accept a request; the backend also marks the pet adopted, so both
    /// collections refetch.
    pub async fn accept_adoption(
        &self,
        request: &AdoptionRequest,
    ) -> AppResult<MutationOutcome<UpdateResult>> {
        self.mutations
            .run(
                &format!("accept-adoption-{}", request.id),
                &["adoptions", "pets"],
                api::adoptions::accept(&self.backend, &request.id, &request.pet_id),
            )
            .await
    }

    pub async fn reject_adoption(&self, request_id: &str) -> AppResult<MutationOutcome<UpdateResult>> {
        self.mutations
            .run(
                &format!("reject-adoption-{}", request_id),
                &["adoptions"],
                api::adoptions::reject(&self.backend, request_id),
            )
            .await
    }

    // --- Donations and users -----------------------------------------------

    /// Refund (delete) one of the signed-in donor's donation records; the
    /// campaign totals and the donor's list both refetch.
    pub async fn refund_donation(&self, donation_id: &str) -> AppResult<MutationOutcome<DeleteResult>> {
        self.mutations
            .run(
                &format!("refund-{}", donation_id),
                &["payments", "donations"],
                api::donations::refund(&self.backend, donation_id),
            )
            .await
    }

    /// Elevate a user to admin; invalidating "users" also drops the role
    /// resolver's cache through its subscription.
    pub async fn make_admin(&self, user_id: &str) -> AppResult<MutationOutcome<UpdateResult>> {
        self.mutations
            .run(
                &format!("make-admin-{}", user_id),
                &["users"],
                api::users::make_admin(&self.backend, user_id),
            )
            .await
    }

    // --- Payments ----------------------------------------------------------

    /// A donation flow for one open modal over the configured gateway.
    pub fn donation_flow(&self, campaign: DonationCampaign) -> AppResult<DonationFlow> {
        let gateway = HttpPaymentGateway::new(&self.config.gateway_url)
            .map_err(AppError::from)?;
        Ok(self.donation_flow_with(campaign, Arc::new(gateway)))
    }

    /// Same, with an explicit gateway (tests inject a scripted one).
    pub fn donation_flow_with(
        &self,
        campaign: DonationCampaign,
        gateway: Arc<dyn PaymentGateway>,
    ) -> DonationFlow {
        DonationFlow::new(
            Arc::new(HttpPaymentsBackend::new(self.backend.clone())),
            gateway,
            self.cache.clone(),
            self.notifier.clone(),
            campaign,
            self.session.principal(),
        )
    }

    /// Upload a pet/campaign image to the image host, returning its display
    /// URL. A host-side "success: false" aborts the enclosing submission.
    pub async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> AppResult<String> {
        api::images::upload(
            self.backend.http(),
            &self.config.image_api_url,
            &self.config.image_api_key,
            filename,
            bytes,
        )
        .await
    }
}
