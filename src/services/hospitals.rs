//! 最近医院查询
//!
//! 邮编 → Nominatim 地理编码 → Overpass 检索周边医院 → 按 haversine 距离排序。
//! 结果按邮编缓存并持久化到磁盘；上游失败时回落到种子数据。
//! 按自由文本位置查询的结果只留在内存里，条目数有上限，过期即清除。

use async_trait::async_trait;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::HospitalConfig;
use crate::error::AppError;
use crate::models::{Hospital, HospitalLookup};

/// 单次查询最多返回的医院数量
pub const MAX_LIMIT: usize = 10;

pub const REMOTE_SOURCE: &str = "OpenStreetMap Nominatim + Overpass";
pub const SEED_SOURCE: &str = "Seed hospital dataset";

const EARTH_RADIUS_KM: f64 = 6371.0;

/// 位置查询缓存键前缀，这类条目不落盘
const LOCATION_KEY_PREFIX: &str = "loc:";

fn is_location_key(key: &str) -> bool {
    key.starts_with(LOCATION_KEY_PREFIX)
}

static PINCODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("valid pincode pattern"));

/// 医院查询错误
#[derive(Debug, Error)]
pub enum HospitalError {
    #[error("Pincode must be a valid 6-digit Indian postal code: '{0}'")]
    InvalidPincode(String),

    #[error("{0}")]
    LookupFailed(String),

    #[error("Hospital lookup HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<HospitalError> for AppError {
    fn from(e: HospitalError) -> Self {
        match e {
            HospitalError::InvalidPincode(_) => AppError::Validation(e.to_string()),
            HospitalError::LookupFailed(_) | HospitalError::Http(_) => {
                AppError::Upstream(e.to_string())
            }
        }
    }
}

/// 医院查询接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HospitalService: Send + Sync {
    /// 按邮编查询最近的医院，`limit` 限制在 1..=10
    async fn lookup_nearest(
        &self,
        pincode: &str,
        limit: usize,
    ) -> Result<HospitalLookup, HospitalError>;

    /// 按自由文本位置查询最近的医院
    async fn lookup_nearest_by_location(
        &self,
        location: &str,
        limit: usize,
    ) -> Result<HospitalLookup, HospitalError>;
}

/// 校验邮编
pub fn normalize_pincode(pincode: &str) -> Result<String, HospitalError> {
    let normalized = pincode.trim();
    if PINCODE_PATTERN.is_match(normalized) {
        Ok(normalized.to_string())
    } else {
        Err(HospitalError::InvalidPincode(normalized.to_string()))
    }
}

/// 两点间球面距离（公里，保留两位小数）
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let lat_diff = (lat2 - lat1).to_radians();
    let lon_diff = (lon2 - lon1).to_radians();
    let a = (lat_diff / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (lon_diff / 2.0).sin().powi(2);
    let distance = 2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt());
    (distance * 100.0).round() / 100.0
}

fn round_coord(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// 磁盘缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    timestamp: i64,
    location: String,
    source: String,
    #[serde(default)]
    pincode: Option<String>,
    hospitals: Vec<Hospital>,
}

/// 种子数据条目
#[derive(Debug, Clone, Deserialize)]
struct SeedEntry {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    hospitals: Vec<Hospital>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    postcode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

/// 地理编码结果
#[derive(Debug, Clone, PartialEq)]
struct GeoPoint {
    latitude: f64,
    longitude: f64,
    location: String,
    postcode: Option<String>,
}

/// 基于 OpenStreetMap 的医院定位器
pub struct HospitalLocator {
    client: reqwest::Client,
    config: HospitalConfig,
    cache: DashMap<String, CacheEntry>,
    persist_lock: Arc<Mutex<()>>,
    seed: HashMap<String, SeedEntry>,
}

impl HospitalLocator {
    pub fn new(config: HospitalConfig) -> Result<Self, HospitalError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        let cache: DashMap<String, CacheEntry> = read_json_map(&config.cache_path)
            .into_iter()
            .filter(|(key, _)| !is_location_key(key))
            .collect();
        let seed = config
            .seed_path
            .as_deref()
            .map(read_json_map)
            .unwrap_or_default();

        info!(
            cached = cache.len(),
            seeded = seed.len(),
            "Hospital locator initialized"
        );

        Ok(Self {
            client,
            config,
            cache,
            persist_lock: Arc::new(Mutex::new(())),
            seed,
        })
    }

    fn ttl_seconds(&self) -> i64 {
        (self.config.cache_ttl_hours as i64).saturating_mul(3600)
    }

    fn cached(&self, key: &str, now: i64, limit: usize) -> Option<HospitalLookup> {
        let entry = self.cache.get(key)?;
        if now - entry.timestamp >= self.ttl_seconds() {
            return None;
        }
        debug!(key, "Hospital cache hit");
        Some(HospitalLookup {
            pincode: entry.pincode.clone().unwrap_or_default(),
            location: entry.location.clone(),
            source: entry.source.clone(),
            cached: true,
            hospitals: entry.hospitals.iter().take(limit).cloned().collect(),
        })
    }

    async fn store(&self, key: String, entry: CacheEntry) {
        let now = entry.timestamp;
        let persistent = !is_location_key(&key);
        self.cache.insert(key, entry);
        self.evict(now);
        if persistent {
            self.persist().await;
        }
    }

    /// 清除过期条目，位置条目超出上限时先淘汰最旧的
    fn evict(&self, now: i64) {
        let ttl = self.ttl_seconds();
        self.cache.retain(|_, entry| now - entry.timestamp < ttl);

        let mut locations: Vec<(String, i64)> = self
            .cache
            .iter()
            .filter(|item| is_location_key(item.key()))
            .map(|item| (item.key().clone(), item.value().timestamp))
            .collect();
        let capacity = self.config.location_cache_capacity;
        if locations.len() <= capacity {
            return;
        }

        locations.sort_by_key(|(_, timestamp)| *timestamp);
        let excess = locations.len() - capacity;
        for (key, _) in locations.into_iter().take(excess) {
            self.cache.remove(&key);
        }
        debug!(evicted = excess, "Location cache trimmed");
    }

    /// 只落盘邮编条目；序列化与写文件放到阻塞线程池
    async fn persist(&self) {
        let snapshot: HashMap<String, CacheEntry> = self
            .cache
            .iter()
            .filter(|item| !is_location_key(item.key()))
            .map(|item| (item.key().clone(), item.value().clone()))
            .collect();
        let path = self.config.cache_path.clone();
        let lock = Arc::clone(&self.persist_lock);

        let written = tokio::task::spawn_blocking(move || {
            let _guard = lock.lock();
            let json = serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?;
            std::fs::write(&path, json).map_err(|e| e.to_string())
        })
        .await;

        let error = match written {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(e) => e.to_string(),
        };
        warn!(
            "Failed to persist hospital cache to {}: {}",
            self.config.cache_path.display(),
            error
        );
    }

    fn seed_fallback(&self, pincode: &str, limit: usize) -> Option<HospitalLookup> {
        let entry = self.seed.get(pincode)?;
        Some(HospitalLookup {
            pincode: pincode.to_string(),
            location: entry
                .location
                .clone()
                .unwrap_or_else(|| format!("Pincode {pincode}, India")),
            source: SEED_SOURCE.to_string(),
            cached: true,
            hospitals: entry.hospitals.iter().take(limit).cloned().collect(),
        })
    }

    async fn geocode(&self, queries: &[Vec<(&str, String)>]) -> Result<GeoPoint, HospitalError> {
        let url = format!("{}/search", self.config.nominatim_url.trim_end_matches('/'));

        for params in queries {
            let places: Vec<NominatimPlace> = self
                .client
                .get(&url)
                .query(params)
                .query(&[("format", "jsonv2"), ("addressdetails", "1"), ("limit", "1")])
                .timeout(Duration::from_secs(self.config.geocode_timeout))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if let Some(place) = places.into_iter().next() {
                let latitude = place.lat.parse::<f64>().map_err(|_| {
                    HospitalError::LookupFailed(format!("Invalid latitude '{}'", place.lat))
                })?;
                let longitude = place.lon.parse::<f64>().map_err(|_| {
                    HospitalError::LookupFailed(format!("Invalid longitude '{}'", place.lon))
                })?;
                return Ok(GeoPoint {
                    latitude,
                    longitude,
                    location: place.display_name.unwrap_or_default(),
                    postcode: place.address.and_then(|a| a.postcode),
                });
            }
        }

        Err(HospitalError::LookupFailed(
            "Unable to resolve the location at the moment.".to_string(),
        ))
    }

    async fn search_hospitals(&self, point: &GeoPoint) -> Result<Vec<Hospital>, HospitalError> {
        let url = format!(
            "{}/api/interpreter",
            self.config.overpass_url.trim_end_matches('/')
        );
        let radius = self.config.search_radius_m;
        let (lat, lon) = (point.latitude, point.longitude);
        let query = format!(
            "[out:json][timeout:30];\n(\n  node[\"amenity\"=\"hospital\"](around:{radius},{lat},{lon});\n  way[\"amenity\"=\"hospital\"](around:{radius},{lat},{lon});\n  relation[\"amenity\"=\"hospital\"](around:{radius},{lat},{lon});\n);\nout center {};",
            self.config.max_results
        );

        let payload: OverpassResponse = self
            .client
            .post(&url)
            .form(&[("data", query)])
            .timeout(Duration::from_secs(self.config.search_timeout))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(collect_hospitals(payload, point, self.config.max_results))
    }

    async fn fetch_remote(&self, queries: &[Vec<(&str, String)>]) -> Result<(GeoPoint, Vec<Hospital>), HospitalError> {
        let point = self.geocode(queries).await?;
        let hospitals = self.search_hospitals(&point).await?;
        if hospitals.is_empty() {
            return Err(HospitalError::LookupFailed(
                "No hospitals were found near this location.".to_string(),
            ));
        }
        Ok((point, hospitals))
    }
}

#[async_trait]
impl HospitalService for HospitalLocator {
    async fn lookup_nearest(
        &self,
        pincode: &str,
        limit: usize,
    ) -> Result<HospitalLookup, HospitalError> {
        let pincode = normalize_pincode(pincode)?;
        let limit = limit.clamp(1, MAX_LIMIT);
        let now = chrono::Utc::now().timestamp();

        if let Some(hit) = self.cached(&pincode, now, limit) {
            return Ok(HospitalLookup { pincode, ..hit });
        }

        let queries = vec![
            vec![
                ("postalcode", pincode.clone()),
                ("country", "India".to_string()),
            ],
            vec![("q", format!("{pincode}, India"))],
        ];

        match self.fetch_remote(&queries).await {
            Ok((point, hospitals)) => {
                let location = if point.location.is_empty() {
                    format!("Pincode {pincode}, India")
                } else {
                    point.location
                };
                let lookup = HospitalLookup {
                    pincode: pincode.clone(),
                    location: location.clone(),
                    source: REMOTE_SOURCE.to_string(),
                    cached: false,
                    hospitals: hospitals.iter().take(limit).cloned().collect(),
                };
                self.store(
                    pincode.clone(),
                    CacheEntry {
                        timestamp: now,
                        location,
                        source: REMOTE_SOURCE.to_string(),
                        pincode: Some(pincode),
                        hospitals,
                    },
                )
                .await;
                Ok(lookup)
            }
            Err(e) => {
                warn!(%pincode, "Hospital lookup failed, trying seed data: {}", e);
                self.seed_fallback(&pincode, limit).ok_or_else(|| {
                    HospitalError::LookupFailed(
                        "Hospital lookup failed right now. Please try again, or ask a nearby PHC/ASHA worker."
                            .to_string(),
                    )
                })
            }
        }
    }

    async fn lookup_nearest_by_location(
        &self,
        location: &str,
        limit: usize,
    ) -> Result<HospitalLookup, HospitalError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(HospitalError::LookupFailed("Location is empty.".to_string()));
        }
        let limit = limit.clamp(1, MAX_LIMIT);
        let now = chrono::Utc::now().timestamp();
        let key = format!("{LOCATION_KEY_PREFIX}{}", location.to_lowercase());

        if let Some(hit) = self.cached(&key, now, limit) {
            return Ok(hit);
        }

        let queries = vec![vec![("q", format!("{location}, India"))]];
        let (point, hospitals) = self.fetch_remote(&queries).await?;
        let resolved = if point.location.is_empty() {
            location.to_string()
        } else {
            point.location
        };
        let lookup = HospitalLookup {
            pincode: point.postcode.clone().unwrap_or_default(),
            location: resolved.clone(),
            source: REMOTE_SOURCE.to_string(),
            cached: false,
            hospitals: hospitals.iter().take(limit).cloned().collect(),
        };
        self.store(
            key,
            CacheEntry {
                timestamp: now,
                location: resolved,
                source: REMOTE_SOURCE.to_string(),
                pincode: point.postcode,
                hospitals,
            },
        )
        .await;
        Ok(lookup)
    }
}

/// 去重、计算距离并排序
fn collect_hospitals(payload: OverpassResponse, origin: &GeoPoint, max_results: usize) -> Vec<Hospital> {
    let mut seen = HashSet::new();
    let mut hospitals: Vec<Hospital> = payload
        .elements
        .into_iter()
        .filter_map(|element| {
            let (lat, lon) = if element.kind == "node" {
                (element.lat?, element.lon?)
            } else {
                let center = element.center?;
                (center.lat, center.lon)
            };
            let name = element
                .tags
                .get("name")
                .cloned()
                .unwrap_or_else(|| "Unnamed Hospital".to_string());
            let key = format!("{}:{}:{}", name, round_coord(lat, 4), round_coord(lon, 4));
            if !seen.insert(key) {
                return None;
            }
            Some(Hospital {
                distance_km: haversine_km(origin.latitude, origin.longitude, lat, lon),
                address: format_address(&element.tags),
                latitude: round_coord(lat, 6),
                longitude: round_coord(lon, 6),
                source: "OpenStreetMap".to_string(),
                contact: element
                    .tags
                    .get("phone")
                    .or_else(|| element.tags.get("contact:phone"))
                    .cloned(),
                name,
            })
        })
        .collect();

    hospitals.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    hospitals.truncate(max_results);
    hospitals
}

fn format_address(tags: &HashMap<String, String>) -> String {
    let parts: Vec<&str> = [
        "addr:housenumber",
        "addr:street",
        "addr:suburb",
        "addr:city",
        "addr:state",
    ]
    .iter()
    .filter_map(|key| tags.get(*key))
    .map(String::as_str)
    .filter(|part| !part.trim().is_empty())
    .collect();

    if parts.is_empty() {
        "Address details not available".to_string()
    } else {
        parts.join(", ")
    }
}

/// 读取 JSON 对象文件；缺失或损坏时返回空表
fn read_json_map<T: serde::de::DeserializeOwned>(path: &Path) -> HashMap<String, T> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return HashMap::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Ignoring malformed hospital data file {}: {}", path.display(), e);
        HashMap::new()
    })
}

/// 创建医院查询服务
pub fn create_hospital_service(
    config: &HospitalConfig,
) -> Result<Box<dyn HospitalService>, HospitalError> {
    Ok(Box::new(HospitalLocator::new(config.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server_uri: &str, dir: &tempfile::TempDir, seed: Option<PathBuf>) -> HospitalConfig {
        HospitalConfig {
            enabled: true,
            cache_path: dir.path().join("cache.json"),
            seed_path: seed,
            cache_ttl_hours: 12,
            nominatim_url: server_uri.to_string(),
            overpass_url: server_uri.to_string(),
            user_agent: "arogya-test".to_string(),
            geocode_timeout: 5,
            search_timeout: 5,
            search_radius_m: 30_000,
            max_results: 25,
            chat_lookup_timeout: 5,
            location_cache_capacity: 3,
        }
    }

    fn overpass_body() -> serde_json::Value {
        serde_json::json!({
            "elements": [
                {"type": "node", "lat": 12.99, "lon": 77.60,
                 "tags": {"name": "Far Hospital", "addr:city": "Bengaluru"}},
                {"type": "way", "center": {"lat": 12.975, "lon": 77.595},
                 "tags": {"name": "Near Hospital", "phone": "080-1234"}},
                {"type": "node", "lat": 12.99, "lon": 77.60,
                 "tags": {"name": "Far Hospital"}},
                {"type": "relation", "tags": {"name": "No Center"}}
            ]
        })
    }

    async fn mount_success(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("postalcode", "560001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "12.9716", "lon": "77.5946", "display_name": "Bengaluru G.P.O, Karnataka, India"}
            ])))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body()))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_normalize_pincode() {
        assert_eq!(normalize_pincode(" 560001 ").unwrap(), "560001");
        assert!(matches!(normalize_pincode("12345"), Err(HospitalError::InvalidPincode(_))));
        assert!(normalize_pincode("012345").is_err());
        assert!(normalize_pincode("56000a").is_err());
    }

    #[test]
    fn test_haversine() {
        assert_eq!(haversine_km(12.9716, 77.5946, 12.9716, 77.5946), 0.0);
        let d = haversine_km(28.6139, 77.2090, 19.0760, 72.8777);
        assert!((d - 1148.0).abs() < 10.0);
    }

    #[test]
    fn test_invalid_pincode_maps_to_validation() {
        let err: AppError = HospitalError::InvalidPincode("1".into()).into();
        assert!(matches!(err, AppError::Validation(_)));
        let err: AppError = HospitalError::LookupFailed("x".into()).into();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_lookup_sorts_dedupes_and_caches() {
        let server = MockServer::start().await;
        mount_success(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let locator = HospitalLocator::new(config(&server.uri(), &dir, None)).unwrap();

        let first = locator.lookup_nearest("560001", 5).await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.source, REMOTE_SOURCE);
        assert_eq!(first.location, "Bengaluru G.P.O, Karnataka, India");
        let names: Vec<&str> = first.hospitals.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Near Hospital", "Far Hospital"]);
        assert_eq!(first.hospitals[0].contact.as_deref(), Some("080-1234"));
        assert_eq!(first.hospitals[0].address, "Address details not available");

        let second = locator.lookup_nearest("560001", 1).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.hospitals.len(), 1);
        assert_eq!(second.pincode, "560001");

        assert!(dir.path().join("cache.json").exists());
    }

    #[tokio::test]
    async fn test_persisted_cache_is_reused() {
        let server = MockServer::start().await;
        mount_success(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&server.uri(), &dir, None);

        HospitalLocator::new(cfg.clone())
            .unwrap()
            .lookup_nearest("560001", 3)
            .await
            .unwrap();
        let reloaded = HospitalLocator::new(cfg).unwrap();
        let hit = reloaded.lookup_nearest("560001", 3).await.unwrap();
        assert!(hit.cached);
    }

    #[tokio::test]
    async fn test_falls_back_to_postal_free_text_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("postalcode", "110001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "110001, India"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "28.63", "lon": "77.21", "display_name": "Connaught Place, New Delhi"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let locator = HospitalLocator::new(config(&server.uri(), &dir, None)).unwrap();
        let lookup = locator.lookup_nearest("110001", 5).await.unwrap();
        assert_eq!(lookup.location, "Connaught Place, New Delhi");
    }

    #[tokio::test]
    async fn test_upstream_failure_uses_seed_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let seed_path = dir.path().join("seed.json");
        std::fs::write(
            &seed_path,
            serde_json::json!({
                "560001": {
                    "location": "Bengaluru",
                    "hospitals": [
                        {"name": "Seed Hospital", "distance_km": 1.2, "latitude": 12.97, "longitude": 77.59, "source": "Seed"}
                    ]
                }
            })
            .to_string(),
        )
        .unwrap();

        let locator =
            HospitalLocator::new(config(&server.uri(), &dir, Some(seed_path))).unwrap();
        let lookup = locator.lookup_nearest("560001", 5).await.unwrap();
        assert!(lookup.cached);
        assert_eq!(lookup.source, SEED_SOURCE);
        assert_eq!(lookup.hospitals[0].name, "Seed Hospital");

        let err = locator.lookup_nearest("400001", 5).await.unwrap_err();
        assert!(matches!(err, HospitalError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn test_invalid_pincode_never_calls_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let locator = HospitalLocator::new(config(&server.uri(), &dir, None)).unwrap();
        let err = locator.lookup_nearest("12345", 5).await.unwrap_err();
        assert!(matches!(err, HospitalError::InvalidPincode(_)));
    }

    async fn mount_any_location(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "12.9857", "lon": "77.6050", "display_name": "Bengaluru"}
            ])))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_location_entries_are_bounded_and_not_persisted() {
        let server = MockServer::start().await;
        mount_any_location(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let locator = HospitalLocator::new(config(&server.uri(), &dir, None)).unwrap();

        for i in 0..10 {
            locator
                .lookup_nearest_by_location(&format!("Ward {i}"), 5)
                .await
                .unwrap();
        }

        let locations = locator
            .cache
            .iter()
            .filter(|item| is_location_key(item.key()))
            .count();
        assert_eq!(locations, 3);
        assert!(!dir.path().join("cache.json").exists());
    }

    #[tokio::test]
    async fn test_persisted_file_holds_only_pincodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("postalcode", "560001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "12.9716", "lon": "77.5946", "display_name": "Bengaluru G.P.O"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body()))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Hoskote, India"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "13.07", "lon": "77.79", "display_name": "Hoskote"}
            ])))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let locator = HospitalLocator::new(config(&server.uri(), &dir, None)).unwrap();

        locator.lookup_nearest_by_location("Hoskote", 5).await.unwrap();
        locator.lookup_nearest("560001", 5).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("cache.json")).unwrap();
        let saved: HashMap<String, serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved.contains_key("560001"));
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted_on_store() {
        let server = MockServer::start().await;
        mount_success(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let locator = HospitalLocator::new(config(&server.uri(), &dir, None)).unwrap();
        locator.cache.insert(
            "110001".to_string(),
            CacheEntry {
                timestamp: 0,
                location: "New Delhi".to_string(),
                source: REMOTE_SOURCE.to_string(),
                pincode: Some("110001".to_string()),
                hospitals: Vec::new(),
            },
        );

        locator.lookup_nearest("560001", 5).await.unwrap();
        assert!(!locator.cache.contains_key("110001"));
        assert!(locator.cache.contains_key("560001"));
    }

    #[tokio::test]
    async fn test_lookup_by_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Shivaji Nagar, India"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "12.9857", "lon": "77.6050", "display_name": "Shivaji Nagar, Bengaluru",
                 "address": {"postcode": "560051"}}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let locator = HospitalLocator::new(config(&server.uri(), &dir, None)).unwrap();
        let lookup = locator
            .lookup_nearest_by_location("Shivaji Nagar", 10)
            .await
            .unwrap();
        assert_eq!(lookup.pincode, "560051");
        assert_eq!(lookup.hospitals.len(), 2);
    }
}
