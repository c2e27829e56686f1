use crate::models::{decode_student, decode_tutor, StudentRecord, TutorRecord};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Documents requested per page when scanning a collection
const PAGE_SIZE: usize = 100;

/// Upper bound on pages fetched for one roster scan
const DEFAULT_MAX_PAGES: usize = 500;

/// Errors that can occur when interacting with the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection IDs in the document store
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub students: String,
    pub tutors: String,
}

/// Document store REST client (Appwrite-compatible databases API)
///
/// Handles all record I/O around the matcher:
/// - Fetching a student record
/// - Scanning the tutor roster
/// - Writing the chosen tutor back onto the student
///
/// Documents may be stored plain or in the tagged encoding; every read is
/// decoded before it leaves this client.
pub struct DocumentStore {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: StoreCollections,
    max_pages: usize,
}

impl DocumentStore {
    /// Create a new document store client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: StoreCollections,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Cap the number of pages a roster scan may request
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/{}",
            self.documents_url(collection),
            urlencoding::encode(document_id)
        )
    }

    /// Fetch a student record by ID
    pub async fn get_student(&self, student_id: &str) -> Result<StudentRecord, StoreError> {
        let url = self.document_url(&self.collections.students, student_id);

        tracing::debug!("Fetching student {} from: {}", student_id, url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let response = check_status(response, || format!("Student {} not found", student_id)).await?;
        let doc: Value = response.json().await?;

        if !doc.is_object() {
            return Err(StoreError::InvalidResponse("Student document is not an object".into()));
        }

        let data = doc.get("data").unwrap_or(&doc);
        Ok(decode_student(data))
    }

    /// Fetch the whole tutor roster
    ///
    /// Pages through the collection until a short page is returned. A scan
    /// that is still receiving full pages after `max_pages` requests fails
    /// with `InvalidResponse`.
    pub async fn list_tutors(&self) -> Result<Vec<TutorRecord>, StoreError> {
        let url = self.documents_url(&self.collections.tutors);
        let mut tutors = Vec::new();
        let mut offset = 0;

        for _ in 0..self.max_pages {
            let queries = vec![format!("limit({})", PAGE_SIZE), format!("offset({})", offset)];
            let queries_json = serde_json::to_string(&queries)
                .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
            let full_url = format!("{}?query={}", url, urlencoding::encode(&queries_json));

            let response = self
                .client
                .get(&full_url)
                .header("X-Appwrite-Key", &self.api_key)
                .header("X-Appwrite-Project", &self.project_id)
                .send()
                .await?;

            let response = check_status(response, || "Tutor collection not found".to_string()).await?;
            let json: Value = response.json().await?;

            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

            tutors.extend(documents.iter().map(|doc| decode_tutor(doc.get("data").unwrap_or(doc))));

            if documents.len() < PAGE_SIZE {
                tracing::debug!("Loaded {} tutors", tutors.len());
                return Ok(tutors);
            }
            offset += documents.len();
        }

        tracing::error!(
            "Tutor roster scan stopped after {} pages ({} documents)",
            self.max_pages,
            tutors.len()
        );
        Err(StoreError::InvalidResponse(format!(
            "Tutor roster exceeds {} pages",
            self.max_pages
        )))
    }

    /// Record the chosen tutor on the student's document
    pub async fn assign_tutor(
        &self,
        student_id: &str,
        tutor_id: &str,
        tutor_name: &str,
    ) -> Result<(), StoreError> {
        let url = self.document_url(&self.collections.students, student_id);

        let payload = json!({
            "data": {
                "assigned_tutor_id": tutor_id,
                "assigned_tutor_name": tutor_name,
            }
        });

        let response = self
            .client
            .patch(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        check_status(response, || format!("Student {} not found", student_id)).await?;

        tracing::debug!("Assigned tutor {} to student {}", tutor_id, student_id);

        Ok(())
    }
}

async fn check_status(
    response: Response,
    not_found: impl FnOnce() -> String,
) -> Result<Response, StoreError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(StoreError::NotFound(not_found())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized),
        status => {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Document store returned {}: {}", status, body);
            Err(StoreError::ApiError(format!("Request failed: {}", status)))
        }
    }
}
