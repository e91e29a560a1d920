//! In-process mock of the three external collaborators: the REST backend,
//! the identity provider and the payment gateway, all served from one axum
//! router over an in-memory store. Behavior mirrors the real backend's
//! contracts closely enough for the engine's integration suites.

// Not every suite touches every helper
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};

use pawhaven::model::{
    AdoptionRequest, DonationCampaign, DonationRecord, Pet, PetCategory, RequestStatus,
    UserAccount, UserRole,
};

pub const PAGE_SIZE: usize = 3;

#[derive(Default)]
pub struct MockDb {
    pub pets: Vec<Pet>,
    pub campaigns: Vec<DonationCampaign>,
    pub adoptions: Vec<AdoptionRequest>,
    pub users: Vec<UserAccount>,
    pub payments: Vec<DonationRecord>,
    pub next_id: u64,
    // Counters the suites assert on
    pub intents_minted: usize,
    pub donation_patches: usize,
    pub confirm_calls: usize,
    pub method_calls: usize,
    // Scripted gateway behavior
    pub decline_cards: bool,
    pub confirm_status: &'static str,
}

impl MockDb {
    pub fn gen_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }
}

#[derive(Clone)]
pub struct MockState(pub Arc<Mutex<MockDb>>);

impl MockState {
    pub fn new() -> Self {
        let mut db = MockDb::default();
        db.confirm_status = "succeeded";
        MockState(Arc::new(Mutex::new(db)))
    }

    pub fn lock(&self) -> parking_lot::MutexGuard<'_, MockDb> {
        self.0.lock()
    }

    pub fn seed_pet(&self, name: &str, category: PetCategory, owner: &str, adopted: bool) -> String {
        let mut db = self.lock();
        let id = db.gen_id("pet");
        let n = db.pets.len() as i64;
        db.pets.push(Pet {
            id: id.clone(),
            pet_name: name.to_string(),
            pet_age: 2,
            pet_category: category,
            pet_location: "Springfield".to_string(),
            short_description: format!("{} looking for a home", name),
            long_description: format!("{} is friendly and house-trained.", name),
            pet_image: format!("http://img.test/{}.png", name),
            owner_email: owner.to_string(),
            owner_name: "Owner".to_string(),
            adopted,
            date_added: Utc.timestamp_opt(1_700_000_000 + n * 3600, 0).unwrap(),
        });
        id
    }

    pub fn seed_campaign(&self, pet_name: &str, owner: &str, paused: bool) -> String {
        let mut db = self.lock();
        let id = db.gen_id("camp");
        db.campaigns.push(DonationCampaign {
            id: id.clone(),
            pet_name: pet_name.to_string(),
            pet_image: format!("http://img.test/{}.png", pet_name),
            max_donation_amount: 500.0,
            donated_amount: 0.0,
            last_date_of_donation: chrono::NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            short_description: "medical fund".to_string(),
            long_description: "long story".to_string(),
            owner_email: owner.to_string(),
            is_paused: paused,
        });
        id
    }

    pub fn seed_user(&self, name: &str, email: &str, role: UserRole) -> String {
        let mut db = self.lock();
        let id = db.gen_id("user");
        db.users.push(UserAccount {
            id: id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            image: None,
            role,
            phone: None,
            address: None,
        });
        id
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn require_auth(headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    match bearer(headers) {
        Some(_) => Ok(()),
        None => Err((StatusCode::UNAUTHORIZED, "missing bearer token".to_string())),
    }
}

// --- pets -------------------------------------------------------------------

async fn list_pets(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let db = state.lock();
    let search = params.get("search").cloned().unwrap_or_default().to_lowercase();
    let category = params.get("category").cloned().unwrap_or_default();
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let sort_by = params.get("sortBy").cloned().unwrap_or_else(|| "dateAdded".into());
    let sort_order = params.get("sortOrder").cloned().unwrap_or_else(|| "desc".into());

    let mut pets: Vec<&Pet> = db
        .pets
        .iter()
        .filter(|p| !p.adopted)
        .filter(|p| search.is_empty() || p.pet_name.to_lowercase().contains(&search))
        .filter(|p| category.is_empty() || p.pet_category.as_str() == category)
        .collect();
    match sort_by.as_str() {
        "petName" => pets.sort_by(|a, b| a.pet_name.cmp(&b.pet_name)),
        _ => pets.sort_by_key(|p| p.date_added),
    }
    if sort_order == "desc" {
        pets.reverse();
    }

    let total_pages = pets.len().div_ceil(PAGE_SIZE);
    let items: Vec<Value> = pets
        .iter()
        .skip(page * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|p| serde_json::to_value(p).unwrap())
        .collect();
    Json(json!({ "pets": items, "currentPage": page, "totalPages": total_pages }))
}

async fn get_pet(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let db = state.lock();
    db.pets
        .iter()
        .find(|p| p.id == id)
        .map(|p| Json(serde_json::to_value(p).unwrap()))
        .ok_or((StatusCode::NOT_FOUND, "no such pet".to_string()))
}

async fn pets_by_owner(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    let pets: Vec<&Pet> = db.pets.iter().filter(|p| p.owner_email == email).collect();
    Ok(Json(serde_json::to_value(pets).unwrap()))
}

async fn admin_pets(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    Ok(Json(serde_json::to_value(&db.pets).unwrap()))
}

async fn create_pet(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let id = db.gen_id("pet");
    let mut doc = body;
    doc["_id"] = json!(id);
    doc["adopted"] = json!(false);
    doc["dateAdded"] = json!(Utc::now());
    let pet: Pet = serde_json::from_value(doc)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    db.pets.push(pet);
    Ok(Json(json!({ "insertedId": id })))
}

async fn update_pet(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let Some(pet) = db.pets.iter_mut().find(|p| p.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such pet".to_string()));
    };
    let mut doc = serde_json::to_value(&*pet).unwrap();
    for (k, v) in body.as_object().cloned().unwrap_or_default() {
        doc[k] = v;
    }
    *pet = serde_json::from_value(doc).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(json!({ "modifiedCount": 1 })))
}

async fn delete_pet(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let before = db.pets.len();
    db.pets.retain(|p| p.id != id);
    Ok(Json(json!({ "deletedCount": before - db.pets.len() })))
}

async fn adopt_pet(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let Some(pet) = db.pets.iter_mut().find(|p| p.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such pet".to_string()));
    };
    pet.adopted = body["adopted"].as_bool().unwrap_or(true);
    Ok(Json(json!({ "modifiedCount": 1 })))
}

// --- campaigns --------------------------------------------------------------

async fn list_campaigns(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let db = state.lock();
    if let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        let subset: Vec<&DonationCampaign> = db.campaigns.iter().take(limit).collect();
        return Json(serde_json::to_value(subset).unwrap());
    }
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let total_pages = db.campaigns.len().div_ceil(PAGE_SIZE);
    let items: Vec<Value> = db
        .campaigns
        .iter()
        .skip(page * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|c| serde_json::to_value(c).unwrap())
        .collect();
    Json(json!({ "campaigns": items, "currentPage": page, "totalPages": total_pages }))
}

async fn get_campaign(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let db = state.lock();
    db.campaigns
        .iter()
        .find(|c| c.id == id)
        .map(|c| Json(serde_json::to_value(c).unwrap()))
        .ok_or((StatusCode::NOT_FOUND, "no such campaign".to_string()))
}

async fn campaigns_by_owner(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    let campaigns: Vec<&DonationCampaign> =
        db.campaigns.iter().filter(|c| c.owner_email == email).collect();
    Ok(Json(serde_json::to_value(campaigns).unwrap()))
}

async fn admin_campaigns(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    Ok(Json(serde_json::to_value(&db.campaigns).unwrap()))
}

async fn create_campaign(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let id = db.gen_id("camp");
    let mut doc = body;
    doc["_id"] = json!(id);
    doc["donatedAmount"] = json!(0.0);
    doc["isPaused"] = json!(false);
    let campaign: DonationCampaign =
        serde_json::from_value(doc).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    db.campaigns.push(campaign);
    Ok(Json(json!({ "insertedId": id })))
}

async fn edit_campaign(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let Some(campaign) = db.campaigns.iter_mut().find(|c| c.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such campaign".to_string()));
    };
    let mut doc = serde_json::to_value(&*campaign).unwrap();
    for (k, v) in body.as_object().cloned().unwrap_or_default() {
        doc[k] = v;
    }
    *campaign =
        serde_json::from_value(doc).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(json!({ "modifiedCount": 1 })))
}

async fn pause_campaign(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let Some(campaign) = db.campaigns.iter_mut().find(|c| c.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such campaign".to_string()));
    };
    campaign.is_paused = body["isPaused"].as_bool().unwrap_or(false);
    Ok(Json(json!({ "modifiedCount": 1 })))
}

async fn admin_delete_campaign(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let before = db.campaigns.len();
    db.campaigns.retain(|c| c.id != id);
    Ok(Json(json!({ "deletedCount": before - db.campaigns.len() })))
}

async fn donators(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    let records: Vec<&DonationRecord> =
        db.payments.iter().filter(|r| r.campaign_id == id).collect();
    Ok(Json(serde_json::to_value(records).unwrap()))
}

/// PATCH /donations/{id}: the payment-success recording path. Increments the
/// campaign total and files a donation record.
async fn record_donation(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let record_id = db.gen_id("don");
    let Some(campaign) = db.campaigns.iter_mut().find(|c| c.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such campaign".to_string()));
    };
    let amount = body["donationAmount"].as_f64().unwrap_or(0.0);
    campaign.donated_amount += amount;
    campaign.last_date_of_donation = Utc::now().date_naive();
    let record = DonationRecord {
        id: record_id,
        donator_name: body["donatorName"].as_str().unwrap_or("anonymous").to_string(),
        donator_email: body["donatorEmail"].as_str().unwrap_or("anonymous").to_string(),
        donation_amount: amount,
        campaign_id: id,
        pet_name: campaign.pet_name.clone(),
        pet_image: campaign.pet_image.clone(),
    };
    db.payments.push(record);
    db.donation_patches += 1;
    Ok(Json(json!({ "modifiedCount": 1 })))
}

// --- adoptions --------------------------------------------------------------

async fn create_adoption(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let id = db.gen_id("req");
    let mut doc = body;
    doc["_id"] = json!(id);
    let request: AdoptionRequest =
        serde_json::from_value(doc).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    db.adoptions.push(request);
    Ok(Json(json!({ "insertedId": id })))
}

async fn adoptions_by_owner(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    let requests: Vec<&AdoptionRequest> =
        db.adoptions.iter().filter(|r| r.pet_owner_email == email).collect();
    Ok(Json(serde_json::to_value(requests).unwrap()))
}

/// Accepting marks the pet adopted and voids the pet's sibling requests.
async fn accept_adoption(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let pet_id = body["petId"].as_str().unwrap_or_default().to_string();
    let Some(request) = db.adoptions.iter_mut().find(|r| r.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such request".to_string()));
    };
    request.status = RequestStatus::Accepted;
    for sibling in db.adoptions.iter_mut().filter(|r| r.pet_id == pet_id && r.id != id) {
        if sibling.status == RequestStatus::Pending {
            sibling.status = RequestStatus::Rejected;
        }
    }
    if let Some(pet) = db.pets.iter_mut().find(|p| p.id == pet_id) {
        pet.adopted = true;
    }
    Ok(Json(json!({ "modifiedCount": 1 })))
}

async fn reject_adoption(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let Some(request) = db.adoptions.iter_mut().find(|r| r.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such request".to_string()));
    };
    request.status = RequestStatus::Rejected;
    Ok(Json(json!({ "modifiedCount": 1 })))
}

// --- users, auth, stats -----------------------------------------------------

async fn jwt(State(_state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    let email = body["email"].as_str().unwrap_or_default();
    Json(json!({ "token": format!("token-for-{}", email) }))
}

async fn upsert_user(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    let mut db = state.lock();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if db.users.iter().any(|u| u.email == email) {
        return Json(json!({ "message": "user already exists" }));
    }
    let id = db.gen_id("user");
    db.users.push(UserAccount {
        id: id.clone(),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email,
        image: body["image"].as_str().map(str::to_string),
        role: UserRole::User,
        phone: body["phone"].as_str().map(str::to_string),
        address: body["address"].as_str().map(str::to_string),
    });
    Json(json!({ "insertedId": id }))
}

async fn list_users(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    Ok(Json(serde_json::to_value(&db.users).unwrap()))
}

async fn is_admin(State(state): State<MockState>, Path(email): Path<String>) -> Json<Value> {
    let db = state.lock();
    let admin = db
        .users
        .iter()
        .any(|u| u.email == email && u.role == UserRole::Admin);
    Json(json!({ "admin": admin }))
}

async fn make_admin(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let Some(user) = db.users.iter_mut().find(|u| u.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such user".to_string()));
    };
    user.role = UserRole::Admin;
    Ok(Json(json!({ "modifiedCount": 1 })))
}

async fn admin_stats(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    let total: f64 = db.payments.iter().map(|p| p.donation_amount).sum();
    Ok(Json(json!({
        "users": db.users.len(),
        "pets": db.pets.len(),
        "totalDonations": total,
    })))
}

async fn user_stats(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    let donated: f64 = db
        .payments
        .iter()
        .filter(|p| p.donator_email == email)
        .map(|p| p.donation_amount)
        .sum();
    Ok(Json(json!({
        "petsAdded": db.pets.iter().filter(|p| p.owner_email == email).count(),
        "campaignsCreated": db.campaigns.iter().filter(|c| c.owner_email == email).count(),
        "totalDonated": donated,
    })))
}

// --- identity provider ------------------------------------------------------

async fn provider_signin(Json(body): Json<Value>) -> Result<Json<Value>, (StatusCode, String)> {
    if body["password"].as_str() == Some("wrong") {
        return Err((StatusCode::UNAUTHORIZED, "invalid credentials".to_string()));
    }
    let email = body["email"].as_str().unwrap_or_default();
    Ok(Json(json!({
        "email": email,
        "displayName": email.split('@').next().unwrap_or("user"),
        "photoUrl": null,
    })))
}

async fn provider_signout() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn provider_profile(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn provider_social(Path(provider): Path<String>) -> Json<Value> {
    Json(json!({
        "email": format!("{}-user@social.test", provider),
        "displayName": "Social User",
        "photoUrl": null,
    }))
}

// --- payment intent + gateway ----------------------------------------------

async fn create_payment_intent(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let amount = body["amount"].as_f64().unwrap_or(0.0);
    if amount <= 0.0 {
        return Err((StatusCode::BAD_REQUEST, "amount must be positive".to_string()));
    }
    let mut db = state.lock();
    db.intents_minted += 1;
    let n = db.intents_minted;
    Ok(Json(json!({ "clientSecret": format!("cs_test_{}", n) })))
}

async fn gateway_methods(
    State(state): State<MockState>,
    Json(_body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut db = state.lock();
    db.method_calls += 1;
    if db.decline_cards {
        return Err((StatusCode::PAYMENT_REQUIRED, "card declined".to_string()));
    }
    Ok(Json(json!({ "id": "pm_test_1" })))
}

async fn gateway_confirm(
    State(state): State<MockState>,
    Json(_body): Json<Value>,
) -> Json<Value> {
    let mut db = state.lock();
    db.confirm_calls += 1;
    Json(json!({ "status": db.confirm_status }))
}

// --- image host -------------------------------------------------------------

async fn image_upload(mut multipart: Multipart) -> Json<Value> {
    let mut filename = String::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        if let Some(name) = field.file_name() {
            filename = name.to_string();
        }
        let _ = field.bytes().await;
    }
    // The host signals some failures as HTTP 200 with success=false
    if filename.contains("bad") {
        return Json(json!({ "success": false }));
    }
    Json(json!({
        "success": true,
        "data": { "display_url": format!("http://img.test/{}", filename) },
    }))
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/{id}", get(get_pet).patch(update_pet).delete(delete_pet))
        .route("/pets/user/{email}", get(pets_by_owner))
        .route("/pets/adopt/{id}", patch(adopt_pet))
        .route("/admin/pets", get(admin_pets))
        .route("/donations", get(list_campaigns).post(create_campaign))
        .route("/donations/{id}", get(get_campaign).patch(record_donation))
        .route("/donations/user/{email}", get(campaigns_by_owner))
        .route("/donations/donators/{id}", get(donators))
        .route("/donations/pause/{id}", patch(pause_campaign))
        .route("/donations-edit/{id}", patch(edit_campaign))
        .route("/admin/donations", get(admin_campaigns))
        .route("/admin/donations/{id}", delete(admin_delete_campaign))
        .route("/adoptions", post(create_adoption))
        .route("/adoptions/{email}", get(adoptions_by_owner))
        .route("/adoptions/accept/{id}", patch(accept_adoption))
        .route("/adoptions/reject/{id}", patch(reject_adoption))
        .route("/payments/{key}", get(payments_by_donor).delete(refund_payment))
        .route("/users", get(list_users).post(upsert_user))
        .route("/users/admin/{id}", get(is_admin).patch(make_admin))
        .route("/user/stats/{email}", get(user_stats))
        .route("/admin/stats", get(admin_stats))
        .route("/jwt", post(jwt))
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/signin", post(provider_signin))
        .route("/signup", post(provider_signin))
        .route("/signout", post(provider_signout))
        .route("/profile", post(provider_profile))
        .route("/social/{provider}", post(provider_social))
        .route("/v1/payment_methods", post(gateway_methods))
        .route("/v1/payment_intents/confirm", post(gateway_confirm))
        .route("/image-upload", post(image_upload))
        .with_state(state)
}

async fn payments_by_donor(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let db = state.lock();
    let records: Vec<&DonationRecord> =
        db.payments.iter().filter(|r| r.donator_email == email).collect();
    Ok(Json(serde_json::to_value(records).unwrap()))
}

async fn refund_payment(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_auth(&headers)?;
    let mut db = state.lock();
    let Some(pos) = db.payments.iter().position(|r| r.id == id) else {
        return Err((StatusCode::NOT_FOUND, "no such donation".to_string()));
    };
    let record = db.payments.remove(pos);
    if let Some(campaign) = db.campaigns.iter_mut().find(|c| c.id == record.campaign_id) {
        campaign.donated_amount -= record.donation_amount;
    }
    Ok(Json(json!({ "deletedCount": 1 })))
}

/// Bind the mock collaborators on an ephemeral port and serve them for the
/// lifetime of the test process.
pub async fn spawn_mock() -> (String, MockState) {
    let state = MockState::new();
    let app = router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}
