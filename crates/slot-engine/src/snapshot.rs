//! A shop's services and provider calendars as one serializable value.

use serde::{Deserialize, Serialize};

use crate::booking::Service;
use crate::calendar::ProviderCalendar;
use crate::config::SlotConfig;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSnapshot {
    #[serde(default)]
    pub config: SlotConfig,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub providers: Vec<ProviderCalendar>,
}

impl ShopSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ShopSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn service(&self, service_id: &str) -> Result<&Service> {
        self.services
            .iter()
            .find(|s| s.id == service_id)
            .ok_or_else(|| EngineError::UnknownService(service_id.to_string()))
    }

    pub fn provider(&self, provider_id: &str) -> Result<&ProviderCalendar> {
        self.providers
            .iter()
            .find(|p| p.provider_id == provider_id)
            .ok_or_else(|| EngineError::UnknownProvider(provider_id.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        for (i, service) in self.services.iter().enumerate() {
            if service.duration == 0 {
                return Err(EngineError::InvalidInput(format!(
                    "service {} has zero duration",
                    service.id
                )));
            }
            if self.services[..i].iter().any(|s| s.id == service.id) {
                return Err(EngineError::InvalidInput(format!(
                    "service {} listed twice",
                    service.id
                )));
            }
        }
        for (i, provider) in self.providers.iter().enumerate() {
            if self.providers[..i]
                .iter()
                .any(|p| p.provider_id == provider.provider_id)
            {
                return Err(EngineError::InvalidInput(format!(
                    "provider {} listed twice",
                    provider.provider_id
                )));
            }
            provider.validate()?;
        }
        Ok(())
    }
}
