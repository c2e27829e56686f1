use crate::models::{StudentRecord, TutorRecord};
use moka::future::{Cache, CacheBuilder};
use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// In-process tier holding decoded records
///
/// Hits hand out shared `Arc`s, so a cached roster is never re-parsed or
/// re-validated. Student entries expire on their own, shorter TTL: clearing a
/// student after an assignment only reaches the instance that made it, and
/// this TTL bounds how long any other instance keeps serving the old record.
#[derive(Clone)]
pub struct RecordCache {
    roster: Cache<(), Arc<Vec<TutorRecord>>>,
    students: Cache<String, Arc<StudentRecord>>,
}

impl RecordCache {
    pub fn new(max_students: u64, roster_ttl: Duration, student_ttl: Duration) -> Self {
        Self {
            roster: CacheBuilder::new(1).time_to_live(roster_ttl).build(),
            students: CacheBuilder::new(max_students)
                .time_to_live(student_ttl)
                .build(),
        }
    }

    pub async fn roster(&self) -> Option<Arc<Vec<TutorRecord>>> {
        self.roster.get(&()).await
    }

    pub async fn put_roster(&self, roster: Arc<Vec<TutorRecord>>) {
        self.roster.insert((), roster).await;
    }

    pub async fn student(&self, student_id: &str) -> Option<Arc<StudentRecord>> {
        self.students.get(student_id).await
    }

    pub async fn put_student(&self, student_id: &str, student: Arc<StudentRecord>) {
        self.students.insert(student_id.to_string(), student).await;
    }

    pub async fn invalidate_student(&self, student_id: &str) {
        self.students.invalidate(student_id).await;
    }
}

/// Two-tier record cache
///
/// L1 is the in-process [`RecordCache`]; L2 is Redis, shared across
/// instances, holding records in their canonical JSON form. An L2 hit is
/// decoded once and promoted into L1.
pub struct CacheManager {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    records: RecordCache,
    ttl_secs: u64,
}

impl CacheManager {
    /// Connect to Redis and build the in-process tier
    ///
    /// `ttl_secs` applies to the roster in both tiers and to students in
    /// Redis; `student_ttl_secs` applies to students held in memory.
    pub async fn new(
        redis_url: &str,
        l1_size: u64,
        ttl_secs: u64,
        student_ttl_secs: u64,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let records = RecordCache::new(
            l1_size,
            Duration::from_secs(ttl_secs),
            Duration::from_secs(student_ttl_secs.min(ttl_secs)),
        );

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            records,
            ttl_secs,
        })
    }

    pub async fn get_roster(&self) -> Result<Option<Arc<Vec<TutorRecord>>>, CacheError> {
        if let Some(roster) = self.records.roster().await {
            tracing::trace!("L1 roster hit ({} tutors)", roster.len());
            return Ok(Some(roster));
        }

        let roster = match self.fetch::<Vec<TutorRecord>>(&CacheKey::tutors()).await? {
            Some(roster) => Arc::new(roster),
            None => return Ok(None),
        };

        self.records.put_roster(Arc::clone(&roster)).await;
        Ok(Some(roster))
    }

    pub async fn set_roster(&self, roster: Arc<Vec<TutorRecord>>) -> Result<(), CacheError> {
        self.records.put_roster(Arc::clone(&roster)).await;
        self.store(&CacheKey::tutors(), roster.as_slice()).await
    }

    pub async fn get_student(&self, student_id: &str) -> Result<Option<Arc<StudentRecord>>, CacheError> {
        if let Some(student) = self.records.student(student_id).await {
            tracing::trace!("L1 student hit: {}", student_id);
            return Ok(Some(student));
        }

        let student = match self.fetch::<StudentRecord>(&CacheKey::student(student_id)).await? {
            Some(student) => Arc::new(student),
            None => return Ok(None),
        };

        self.records.put_student(student_id, Arc::clone(&student)).await;
        Ok(Some(student))
    }

    pub async fn set_student(&self, student_id: &str, student: Arc<StudentRecord>) -> Result<(), CacheError> {
        self.records.put_student(student_id, Arc::clone(&student)).await;
        self.store(&CacheKey::student(student_id), student.as_ref()).await
    }

    /// Drop a student from this instance's memory and from Redis
    pub async fn invalidate_student(&self, student_id: &str) -> Result<(), CacheError> {
        self.records.invalidate_student(student_id).await;

        let mut conn = self.redis.lock().await;
        redis::cmd("DEL")
            .arg(CacheKey::student(student_id))
            .query_async::<()>(&mut *conn)
            .await?;
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        match value {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    async fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }
}

/// Redis key builder
pub struct CacheKey;

impl CacheKey {
    pub fn tutors() -> String {
        "tutors:roster".to_string()
    }

    pub fn student(student_id: &str) -> String {
        format!("student:{}", student_id)
    }
}
