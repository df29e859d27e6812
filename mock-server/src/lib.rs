use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub name: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "available" => Some(PetStatus::Available),
            "pending" => Some(PetStatus::Pending),
            "sold" => Some(PetStatus::Sold),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ApiResponse {
    fn ok(message: String) -> Self {
        Self {
            code: 200,
            kind: "unknown".to_string(),
            message,
        }
    }

    fn error(code: i32, message: &str) -> Self {
        Self {
            code,
            kind: "error".to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct FindByStatus {
    #[serde(default)]
    pub status: String,
}

#[derive(Deserialize)]
pub struct PetForm {
    pub name: Option<String>,
    pub status: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<i64, Pet>>>;

type ApiError = (StatusCode, Json<ApiResponse>);

fn pet_not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error(1, "Pet not found")))
}

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(400, message)))
}

fn ids_exhausted() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(500, "No pet id available")),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/pet", post(add_pet).put(update_pet))
        .route("/pet/findByStatus", get(find_pets_by_status))
        .route(
            "/pet/{pet_id}",
            get(get_pet).post(update_pet_with_form).delete(delete_pet),
        )
        .route("/pet/{pet_id}/uploadImage", post(upload_file))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "pet service listening");
    }
    axum::serve(listener, app().layer(TraceLayer::new_for_http())).await
}

async fn add_pet(State(db): State<Db>, Json(mut pet): Json<Pet>) -> Result<Json<Pet>, ApiError> {
    let mut pets = db.write().await;
    let id = match pet.id {
        Some(id) => id,
        None => match pets.keys().max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(ids_exhausted)?,
        },
    };
    pet.id = Some(id);
    debug!(id, name = %pet.name, "storing pet");
    pets.insert(id, pet.clone());
    Ok(Json(pet))
}

async fn update_pet(State(db): State<Db>, Json(pet): Json<Pet>) -> Result<Json<Pet>, ApiError> {
    let id = pet.id.ok_or_else(|| bad_request("Invalid ID supplied"))?;
    let mut pets = db.write().await;
    let stored = pets.get_mut(&id).ok_or_else(pet_not_found)?;
    *stored = pet.clone();
    debug!(id, "updated pet");
    Ok(Json(pet))
}

async fn get_pet(State(db): State<Db>, Path(pet_id): Path<i64>) -> Result<Json<Pet>, ApiError> {
    let pets = db.read().await;
    pets.get(&pet_id).cloned().map(Json).ok_or_else(pet_not_found)
}

async fn delete_pet(State(db): State<Db>, Path(pet_id): Path<i64>) -> Result<Json<ApiResponse>, ApiError> {
    let mut pets = db.write().await;
    pets.remove(&pet_id).ok_or_else(pet_not_found)?;
    debug!(id = pet_id, "deleted pet");
    Ok(Json(ApiResponse::ok(pet_id.to_string())))
}

async fn find_pets_by_status(
    State(db): State<Db>,
    Query(query): Query<FindByStatus>,
) -> Result<Json<Vec<Pet>>, ApiError> {
    let mut wanted = Vec::new();
    for raw in query.status.split(',').filter(|s| !s.trim().is_empty()) {
        wanted.push(PetStatus::parse(raw).ok_or_else(|| bad_request("Invalid status value"))?);
    }
    let pets = db.read().await;
    let mut found: Vec<Pet> = pets
        .values()
        .filter(|p| p.status.is_some_and(|s| wanted.contains(&s)))
        .cloned()
        .collect();
    found.sort_by_key(|p| p.id);
    Ok(Json(found))
}

async fn update_pet_with_form(
    State(db): State<Db>,
    Path(pet_id): Path<i64>,
    Form(form): Form<PetForm>,
) -> Result<Json<ApiResponse>, ApiError> {
    let status = match form.status.as_deref() {
        Some(raw) => Some(PetStatus::parse(raw).ok_or_else(|| bad_request("Invalid input"))?),
        None => None,
    };
    let mut pets = db.write().await;
    let pet = pets.get_mut(&pet_id).ok_or_else(pet_not_found)?;
    if let Some(name) = form.name {
        pet.name = name;
    }
    if status.is_some() {
        pet.status = status;
    }
    Ok(Json(ApiResponse::ok(pet_id.to_string())))
}

async fn upload_file(
    State(db): State<Db>,
    Path(pet_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse>, ApiError> {
    if !db.read().await.contains_key(&pet_id) {
        return Err(pet_not_found());
    }

    let mut metadata = None;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("additionalMetadata") => {
                metadata = Some(field.text().await.map_err(|e| bad_request(&e.body_text()))?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("file").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| bad_request(&e.body_text()))?;
                upload = Some((file_name, content_type, data.len()));
            }
            _ => {}
        }
    }

    let (file_name, content_type, size) = upload.ok_or_else(|| bad_request("Missing file part"))?;
    debug!(id = pet_id, %file_name, %content_type, size, "received upload");
    let mut message = String::new();
    if let Some(metadata) = metadata {
        message.push_str(&format!("additionalMetadata: {metadata}\n"));
    }
    message.push_str(&format!(
        "File uploaded to ./{file_name} ({content_type}), {size} bytes"
    ));
    Ok(Json(ApiResponse::ok(message)))
}
