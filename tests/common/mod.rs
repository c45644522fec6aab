#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use homescout::api::{Backend, SavedSettings};
use homescout::app::{FilterEngine, SettingsStore};
use homescout::storage::SettingsCache;
use homescout::{AppState, ClearPolicy, HomescoutError, Property, Result, Settings};

pub const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
struct Listings {
    properties: Vec<Property>,
    settings: Settings,
    settings_reachable: bool,
    calls: Vec<&'static str>,
}

/// In-memory listings backend. Clones share state, so a test can keep a
/// handle after moving one into a runtime.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    listings: Arc<Mutex<Listings>>,
    latency: Duration,
}

impl FakeBackend {
    pub fn with_prices(prices: &[f64]) -> Self {
        let properties = prices
            .iter()
            .enumerate()
            .map(|(index, price)| {
                let mut property = Property::new(format!("p{index}"));
                property.list_price = Some(*price);
                property
            })
            .collect();
        Self {
            listings: Arc::new(Mutex::new(Listings {
                properties,
                settings: Settings::default(),
                settings_reachable: true,
                calls: Vec::new(),
            })),
            latency: Duration::from_millis(20),
        }
    }

    pub fn settings_unreachable(self) -> Self {
        self.listings.lock().expect("lock").settings_reachable = false;
        self
    }

    pub fn with_settings(self, settings: Settings) -> Self {
        self.listings.lock().expect("lock").settings = settings;
        self
    }

    pub fn calls(&self, name: &str) -> usize {
        self.listings
            .lock()
            .expect("lock")
            .calls
            .iter()
            .filter(|call| **call == name)
            .count()
    }

    async fn call(&self, name: &'static str) {
        tokio::time::sleep(self.latency).await;
        self.listings.lock().expect("lock").calls.push(name);
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_properties(&self) -> Result<Vec<Property>> {
        self.call("list_properties").await;
        Ok(self.listings.lock().expect("lock").properties.clone())
    }

    async fn list_favorites(&self) -> Result<Vec<Property>> {
        self.call("list_favorites").await;
        let listings = self.listings.lock().expect("lock");
        Ok(listings.properties.iter().filter(|p| p.favorited).cloned().collect())
    }

    async fn toggle_favorite(&self, id: &str) -> Result<bool> {
        self.call("toggle_favorite").await;
        let mut listings = self.listings.lock().expect("lock");
        let property = listings
            .properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| HomescoutError::Api {
                status: 404,
                message: Some("Property not found".to_string()),
            })?;
        property.favorited = !property.favorited;
        Ok(property.favorited)
    }

    async fn get_settings(&self) -> Result<Settings> {
        self.call("get_settings").await;
        let listings = self.listings.lock().expect("lock");
        if listings.settings_reachable {
            Ok(listings.settings)
        } else {
            Err(HomescoutError::Network("connection refused".to_string()))
        }
    }

    async fn save_settings(&self, settings: &Settings) -> Result<SavedSettings> {
        self.call("save_settings").await;
        self.listings.lock().expect("lock").settings = *settings;
        Ok(SavedSettings {
            settings: *settings,
            message: Some("Settings updated successfully".to_string()),
        })
    }

    async fn manual_scrape(&self) -> Result<()> {
        self.call("manual_scrape").await;
        Ok(())
    }
}

pub fn state(policy: ClearPolicy, cache: Option<Box<dyn SettingsCache>>) -> AppState {
    AppState::new(FilterEngine::new(DEBOUNCE, policy), SettingsStore::new(cache))
}

pub fn ids(properties: &[Property]) -> Vec<&str> {
    properties.iter().map(|p| p.id.as_str()).collect()
}
