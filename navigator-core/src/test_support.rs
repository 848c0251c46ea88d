//! Test doubles and sample data shared by unit and behaviour tests.

use std::collections::HashMap;

use geo::{Coord, MultiPolygon};
use serde_json::json;

use crate::indicators::{COUNTRY_COLUMN, GDP_COLUMN, HAPPINESS_COLUMN, INFLATION_COLUMN, YEAR_COLUMN};
use crate::{
    AuthError, Datasets, GlobalIndicators, Governorate, GovernorateId, GovernorateSet,
    IdentityProvider, IndicatorRow, InvestmentMetrics, MapSurface, MarkerStyle, ScoreRecord,
    ScoringMethodology, Sector, SectorCatalog, SectorData, SectorRecord, ShapeId, ShapeStyle,
    UserProfile,
};

/// A call received by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    /// `draw_polygon` with the fill colour used.
    DrawPolygon {
        /// Handle returned to the caller.
        shape: ShapeId,
        /// Applied style.
        style: ShapeStyle,
    },
    /// `draw_circle_marker` with its position and style.
    DrawMarker {
        /// Handle returned to the caller.
        shape: ShapeId,
        /// Marker centre.
        at: Coord<f64>,
        /// Applied style.
        style: MarkerStyle,
    },
    /// `restyle_polygon`.
    RestylePolygon {
        /// Target shape.
        shape: ShapeId,
        /// New style.
        style: ShapeStyle,
    },
    /// `restyle_marker`.
    RestyleMarker {
        /// Target shape.
        shape: ShapeId,
        /// New style.
        style: MarkerStyle,
    },
    /// `bind_popup`.
    BindPopup {
        /// Target shape.
        shape: ShapeId,
        /// Popup text.
        content: String,
    },
}

/// [`MapSurface`] that records every call in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    next_shape: usize,
}

impl RecordingSurface {
    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Number of markers drawn.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::DrawMarker { .. }))
            .count()
    }

    /// Number of polygons drawn.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::DrawPolygon { .. }))
            .count()
    }

    /// Latest popup text bound to `shape`.
    #[must_use]
    pub fn popup(&self, shape: ShapeId) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::BindPopup { shape: bound, content } if *bound == shape => {
                Some(content.as_str())
            }
            _ => None,
        })
    }

    fn allocate(&mut self) -> ShapeId {
        let shape = ShapeId::new(self.next_shape);
        self.next_shape += 1;
        shape
    }
}

impl MapSurface for RecordingSurface {
    fn draw_polygon(&mut self, _geometry: &MultiPolygon<f64>, style: &ShapeStyle) -> ShapeId {
        let shape = self.allocate();
        self.calls.push(SurfaceCall::DrawPolygon {
            shape,
            style: style.clone(),
        });
        shape
    }

    fn draw_circle_marker(&mut self, at: Coord<f64>, style: &MarkerStyle) -> ShapeId {
        let shape = self.allocate();
        self.calls.push(SurfaceCall::DrawMarker {
            shape,
            at,
            style: style.clone(),
        });
        shape
    }

    fn restyle_polygon(&mut self, shape: ShapeId, style: &ShapeStyle) {
        self.calls.push(SurfaceCall::RestylePolygon {
            shape,
            style: style.clone(),
        });
    }

    fn restyle_marker(&mut self, shape: ShapeId, style: &MarkerStyle) {
        self.calls.push(SurfaceCall::RestyleMarker {
            shape,
            style: style.clone(),
        });
    }

    fn bind_popup(&mut self, shape: ShapeId, content: &str) {
        self.calls.push(SurfaceCall::BindPopup {
            shape,
            content: content.to_owned(),
        });
    }
}

/// Minimum password length accepted by [`MemoryIdentityProvider`].
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    profile: UserProfile,
}

/// In-memory [`IdentityProvider`].
#[derive(Debug, Default, Clone)]
pub struct MemoryIdentityProvider {
    accounts: HashMap<String, Account>,
    current: Option<String>,
    verification_emails: Vec<String>,
    reset_emails: Vec<String>,
}

impl MemoryIdentityProvider {
    /// Seed an account without going through registration.
    pub fn add_account(&mut self, email: &str, password: &str, verified: bool) {
        let profile = UserProfile {
            uid: format!("uid-{}", self.accounts.len() + 1),
            email: email.to_owned(),
            display_name: None,
            email_verified: verified,
        };
        self.accounts.insert(
            email.to_owned(),
            Account {
                password: password.to_owned(),
                profile,
            },
        );
    }

    /// Mark an account's email as verified.
    pub fn verify(&mut self, email: &str) {
        if let Some(account) = self.accounts.get_mut(email) {
            account.profile.email_verified = true;
        }
    }

    /// Addresses that were sent a verification email, in order.
    #[must_use]
    pub fn verification_emails(&self) -> &[String] {
        &self.verification_emails
    }

    /// Addresses that were sent a password reset email, in order.
    #[must_use]
    pub fn reset_emails(&self) -> &[String] {
        &self.reset_emails
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    fn register(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<UserProfile, AuthError> {
        if self.accounts.contains_key(email) {
            return Err(AuthError::EmailInUse {
                email: email.to_owned(),
            });
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min_length: MIN_PASSWORD_LENGTH,
            });
        }
        self.add_account(email, password, false);
        let account = self
            .accounts
            .get_mut(email)
            .ok_or_else(|| AuthError::UnknownAccount {
                email: email.to_owned(),
            })?;
        account.profile.display_name = Some(display_name.to_owned());
        self.current = Some(email.to_owned());
        Ok(account.profile.clone())
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let account = self
            .accounts
            .get(email)
            .filter(|account| account.password == password)
            .ok_or(AuthError::InvalidCredentials)?;
        self.current = Some(email.to_owned());
        Ok(account.profile.clone())
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        self.current = None;
        Ok(())
    }

    fn send_password_reset(&mut self, email: &str) -> Result<(), AuthError> {
        if !self.accounts.contains_key(email) {
            return Err(AuthError::UnknownAccount {
                email: email.to_owned(),
            });
        }
        self.reset_emails.push(email.to_owned());
        Ok(())
    }

    fn send_email_verification(&mut self) -> Result<(), AuthError> {
        let email = self.current.clone().ok_or(AuthError::NotSignedIn)?;
        self.verification_emails.push(email);
        Ok(())
    }

    fn current_user(&self) -> Option<UserProfile> {
        self.current
            .as_ref()
            .and_then(|email| self.accounts.get(email))
            .map(|account| account.profile.clone())
    }
}

/// Four governorates: Tunis, Sousse and Kairouan with coordinates, and
/// Tozeur without.
#[must_use]
pub fn sample_governorates() -> GovernorateSet {
    GovernorateSet::new(vec![
        Governorate::new(GovernorateId::new(1), "Tunis").with_coordinates(36.8065, 10.1815),
        Governorate::new(GovernorateId::new(2), "Sousse").with_coordinates(35.8256, 10.6369),
        Governorate::new(GovernorateId::new(3), "Kairouan").with_coordinates(35.6781, 10.0963),
        Governorate::new(GovernorateId::new(4), "Tozeur"),
    ])
}

/// Tourism, agriculture and manufacturing buckets.
#[must_use]
pub fn sample_sectors() -> SectorCatalog {
    SectorCatalog::from_iter([
        (
            Sector::new("tourism"),
            SectorData::new(vec![
                SectorRecord::new(GovernorateId::new(2))
                    .with_attribute("name", "Sousse")
                    .with_attribute("hotel_capacity", 42_000)
                    .with_attribute("annual_visitors", 1_900_000)
                    .with_attribute("cultural_sites", 12),
                SectorRecord::new(GovernorateId::new(1))
                    .with_attribute("name", "Tunis")
                    .with_attribute("hotel_capacity", 18_000),
            ]),
        ),
        (
            Sector::new("agriculture"),
            SectorData::new(vec![
                SectorRecord::new(GovernorateId::new(3))
                    .with_attribute("arable_land_percentage", 61)
                    .with_attribute("main_crops", json!(["olives", "cereals"]))
                    .with_attribute("water_availability_score", 5),
            ]),
        ),
        (Sector::new("manufacturing"), SectorData::default()),
    ])
}

/// Scores: tourism Sousse 88, Tunis 72, Kairouan 55; agriculture Kairouan
/// 81 and Tozeur 64. Manufacturing has none.
#[must_use]
pub fn sample_metrics() -> InvestmentMetrics {
    let tourism = Sector::new("tourism");
    let agriculture = Sector::new("agriculture");
    let mut sousse = ScoreRecord::with_total(88.0);
    sousse.strengths = vec!["Coastal resorts".to_owned()];
    sousse.challenges = vec!["Seasonal demand".to_owned()];
    sousse.opportunities = vec!["Medical tourism".to_owned()];
    InvestmentMetrics::from_records([
        (GovernorateId::new(2), tourism.clone(), sousse),
        (GovernorateId::new(1), tourism.clone(), ScoreRecord::with_total(72.0)),
        (GovernorateId::new(3), tourism, ScoreRecord::with_total(55.0)),
        (GovernorateId::new(3), agriculture.clone(), ScoreRecord::with_total(81.0)),
        (GovernorateId::new(4), agriculture, ScoreRecord::with_total(64.0)),
    ])
    .with_methodology(ScoringMethodology {
        weights: [
            ("infrastructure".to_owned(), 0.3),
            ("labour".to_owned(), 0.4),
            ("market_access".to_owned(), 0.3),
        ]
        .into_iter()
        .collect(),
    })
}

/// A handful of indicator rows for Tunisia and Morocco.
#[must_use]
pub fn sample_indicators() -> GlobalIndicators {
    let headers = [
        COUNTRY_COLUMN,
        YEAR_COLUMN,
        INFLATION_COLUMN,
        GDP_COLUMN,
        HAPPINESS_COLUMN,
    ];
    [
        ["Tunisia", "2022", "8.3", "3924", "4.5"],
        ["Tunisia", "2021", "5.7", "3807", "4.6"],
        ["Morocco", "2022", "6.6", "3527", "5.1"],
    ]
    .iter()
    .map(|fields| IndicatorRow::from_fields(&headers, fields))
    .collect()
}

/// Every sample dataset bundled together.
#[must_use]
pub fn sample_datasets() -> Datasets {
    Datasets::new(
        sample_indicators(),
        sample_governorates(),
        sample_sectors(),
        sample_metrics(),
    )
}
