use super::assets::DEFAULT_LOAD_FAILED_MESSAGE;
use super::AssetService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockAssetLoader {
    assets: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fetch_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockAssetLoader {
    pub fn new() -> Self {
        Self {
            assets: Arc::new(Mutex::new(HashMap::new())),
            fetch_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_asset(self, location: &str, bytes: Vec<u8>) -> Self {
        self.assets
            .lock()
            .unwrap()
            .insert(location.trim_start_matches('/').to_string(), bytes);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_fetch_count(&self) -> usize {
        *self.fetch_count.lock().unwrap()
    }
}

impl Default for MockAssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetService for MockAssetLoader {
    async fn fetch_asset(&self, location: &str) -> Result<Vec<u8>> {
        *self.fetch_count.lock().unwrap() += 1;

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Read(DEFAULT_LOAD_FAILED_MESSAGE.to_string()));
        }

        self.assets
            .lock()
            .unwrap()
            .get(location.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| Error::Read(DEFAULT_LOAD_FAILED_MESSAGE.to_string()))
    }
}
