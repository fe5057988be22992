use serde::{Deserialize, Serialize};

/// Smallest per-cycle target accepted for a custom offer.
pub const MIN_CUSTOM_CONTACTS_TARGET: u32 = 100;

pub const CUSTOM_OFFER: &str = "Offre personnalisée";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Phone,
    Email,
    #[serde(rename = "linkedin")]
    LinkedIn,
}

impl Channel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Phone => "Téléphone",
            Self::Email => "E-mail",
            Self::LinkedIn => "LinkedIn",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Offer {
    pub name: &'static str,
    /// Contacts addressed per cycle; `None` when the client sets it.
    pub contacts_target: Option<u32>,
    pub channels: Vec<Channel>,
    pub linkedin_optional: bool,
}

impl Offer {
    pub fn default_channels(&self) -> Vec<Channel> {
        let mut channels = self.channels.clone();
        if self.linkedin_optional && !channels.contains(&Channel::LinkedIn) {
            channels.push(Channel::LinkedIn);
        }
        channels
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferCatalog {
    offers: Vec<Offer>,
}

impl OfferCatalog {
    pub fn standard() -> Self {
        Self {
            offers: standard_offers(),
        }
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn find(&self, name: &str) -> Option<&Offer> {
        let name = name.trim();
        self.offers.iter().find(|offer| offer.name == name)
    }
}

fn standard_offers() -> Vec<Offer> {
    let multichannel = |name: &'static str, target: u32| Offer {
        name,
        contacts_target: Some(target),
        channels: vec![Channel::Phone, Channel::Email],
        linkedin_optional: true,
    };

    vec![
        multichannel("Multi 2J", 600),
        multichannel("Multi 3J", 900),
        multichannel("Multi 4J", 1200),
        multichannel("Multi 5J", 1500),
        Offer {
            name: "Full Digital",
            contacts_target: Some(800),
            channels: vec![Channel::Email],
            linkedin_optional: false,
        },
        Offer {
            name: CUSTOM_OFFER,
            contacts_target: None,
            channels: vec![Channel::Phone, Channel::Email],
            linkedin_optional: true,
        },
    ]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCadence {
    #[default]
    Weekly,
    Monthly,
}

impl ReportCadence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekly => "Hebdomadaire",
            Self::Monthly => "Mensuel",
        }
    }
}

/// What the caller supplies to describe the mission a report covers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MissionContextRequest {
    pub client_name: Option<String>,
    pub offer: Option<String>,
    pub contacts_target: Option<u32>,
    pub cadence: ReportCadence,
    pub cycle_label: Option<String>,
    pub channels: Option<Vec<Channel>>,
}

/// Informational header of a report. Never feeds the KPI computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionContext {
    pub client_name: String,
    pub offer: String,
    pub contacts_target: u32,
    pub cadence: ReportCadence,
    pub cadence_label: &'static str,
    pub cycle_label: String,
    pub channels: Vec<Channel>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OfferError {
    #[error("unknown offer '{0}'")]
    UnknownOffer(String),
    #[error("offer '{offer}' requires a contacts target of at least {minimum}")]
    MissingContactsTarget { offer: String, minimum: u32 },
}

impl MissionContext {
    pub fn resolve(
        catalog: &OfferCatalog,
        request: MissionContextRequest,
    ) -> Result<Self, OfferError> {
        let offer = match request.offer {
            Some(name) => catalog
                .find(&name)
                .ok_or(OfferError::UnknownOffer(name))?,
            None => catalog
                .offers()
                .first()
                .ok_or_else(|| OfferError::UnknownOffer(String::new()))?,
        };

        let contacts_target = match offer.contacts_target {
            Some(target) => target,
            None => request
                .contacts_target
                .filter(|target| *target >= MIN_CUSTOM_CONTACTS_TARGET)
                .ok_or_else(|| OfferError::MissingContactsTarget {
                    offer: offer.name.to_string(),
                    minimum: MIN_CUSTOM_CONTACTS_TARGET,
                })?,
        };

        Ok(Self {
            client_name: request
                .client_name
                .unwrap_or_else(|| "Client Exemple".to_string()),
            offer: offer.name.to_string(),
            contacts_target,
            cadence: request.cadence,
            cadence_label: request.cadence.label(),
            cycle_label: request
                .cycle_label
                .unwrap_or_else(|| "Semaine 1".to_string()),
            channels: request
                .channels
                .unwrap_or_else(|| offer.default_channels()),
        })
    }

    pub fn channel_labels(&self) -> String {
        self.channels
            .iter()
            .map(|channel| channel.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
