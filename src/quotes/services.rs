//! Quote assembly.
//!
//! Builds one quote item per hotel, or per activity when no hotel is
//! selected, and attaches addons, gastronomy, the transport leg and every
//! cart-level extra. Upstream failures (geocoding, CMS reads) degrade to
//! flagged data; only invalid input fails the request.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::AppCache;
use crate::cms::queries::{self, ActivityLocation};
use crate::cms::CmsClient;
use crate::geo::{locate, Geocoder, Located};
use crate::pricing::{
    calculate_activity_price, calculate_gastronomy, calculate_hotel_price, calculate_item_price,
    plan_buses, resolve_leg, BusPlan, Destination, ItemPricing, Price, TransportSettings,
};

use super::ids::generate_quote_id;
use super::requests::{QuoteRequest, SelectedActivity, SelectedAddon, SelectedHotel};
use super::responses::{EntityPrice, PricedLine, Quote, QuoteItem};

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Invalid quote request: {0}")]
    InvalidRequest(String),
}

/// Transport state shared by every leg of one request.
#[derive(Debug, Clone)]
struct TransportContext {
    settings: TransportSettings,
    plan: BusPlan,
    pickup: Located,
}

pub struct QuoteService {
    cms: Arc<dyn CmsClient>,
    geocoder: Arc<dyn Geocoder>,
    cache: AppCache,
    transport_fallback: TransportSettings,
}

impl QuoteService {
    pub fn new(
        cms: Arc<dyn CmsClient>,
        geocoder: Arc<dyn Geocoder>,
        cache: AppCache,
        transport_fallback: TransportSettings,
    ) -> Self {
        Self {
            cms,
            geocoder,
            cache,
            transport_fallback,
        }
    }

    /// Price the cart and assemble the quote. Nothing is persisted here.
    pub async fn build_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        if request.participant_count == 0 {
            return Err(QuoteError::InvalidRequest(
                "participantCount must be positive".to_string(),
            ));
        }

        let participants = request.participant_count;
        let extras: Vec<PricedLine> = request
            .priced_extras()
            .map(|extra| {
                price_line(&extra.id, &extra.name, extra.pricing.as_ref(), extra.count, participants)
            })
            .collect();

        let transport = self.transport_context(request).await;

        let items = if !request.hotels.is_empty() {
            if !request.activities.is_empty() {
                info!(
                    "Hotel-led quote: {} selected activities are not priced",
                    request.activities.len()
                );
            }
            let mut items = Vec::with_capacity(request.hotels.len());
            for hotel in &request.hotels {
                items.push(self.hotel_item(request, hotel, transport.as_ref(), &extras).await);
            }
            items
        } else {
            let locations = self.activity_locations(request).await;
            let mut items = Vec::with_capacity(request.activities.len());
            for activity in &request.activities {
                let location = activity
                    .location
                    .as_ref()
                    .or_else(|| locations.get(&activity.id));
                items.push(
                    self.activity_item(request, activity, location, transport.as_ref(), &extras)
                        .await,
                );
            }
            items
        };

        let total: Price = items.iter().map(|item| item.total()).sum();

        let quote = Quote {
            quote_id: generate_quote_id(),
            created_at: Utc::now(),
            participant_count: participants,
            language: request.language.clone(),
            selected_dates: request.selected_dates.clone(),
            items,
            total_price: total.brutto,
            total_netto_price: total.netto,
        };

        info!(
            "Quote {} assembled: {} items, {} netto / {} brutto",
            quote.quote_id,
            quote.items.len(),
            quote.total_netto_price,
            quote.total_price
        );

        Ok(quote)
    }

    async fn hotel_item(
        &self,
        request: &QuoteRequest,
        hotel: &SelectedHotel,
        transport: Option<&TransportContext>,
        extras: &[PricedLine],
    ) -> QuoteItem {
        let participants = request.participant_count;
        let price = calculate_hotel_price(&hotel.pricing, hotel.max_overnight_people, participants);
        if price.exceeds_max_people {
            debug!(
                "Hotel {} priced for {} of {} participants",
                hotel.id, price.calculated_for, participants
            );
        }

        let gastronomy = calculate_gastronomy(
            &request.gastronomy,
            hotel.gastronomy.as_ref(),
            &request.language,
        );

        let leg = match transport {
            Some(ctx) => {
                let destination = locate(self.geocoder.as_ref(), hotel.address.as_ref()).await;
                resolve_leg(&ctx.settings, &ctx.plan, ctx.pickup, destination, Destination::Hotel)
            }
            None => None,
        };

        QuoteItem::new(
            hotel.id.clone(),
            hotel.name.clone(),
            EntityPrice::Hotel(price),
            price_addons(&hotel.addons, participants),
            gastronomy,
            leg,
            extras.to_vec(),
        )
    }

    async fn activity_item(
        &self,
        request: &QuoteRequest,
        activity: &SelectedActivity,
        location: Option<&ActivityLocation>,
        transport: Option<&TransportContext>,
        extras: &[PricedLine],
    ) -> QuoteItem {
        let participants = request.participant_count;
        let price = calculate_activity_price(
            activity.pricing.as_ref(),
            activity.participants.as_ref(),
            participants,
        );
        if price.pricing_missing {
            warn!(
                "Activity {} ({}) has no valid base pricing; priced at zero",
                activity.id, activity.name
            );
        }

        let leg = match transport {
            Some(ctx) => {
                let (address, kind) = match location {
                    Some(loc) if loc.nationwide => (
                        request.activity_address.as_ref(),
                        Destination::NationwideActivity,
                    ),
                    Some(loc) => (loc.address.as_ref(), Destination::Activity),
                    None => (None, Destination::Activity),
                };
                let destination = locate(self.geocoder.as_ref(), address).await;
                resolve_leg(&ctx.settings, &ctx.plan, ctx.pickup, destination, kind)
            }
            None => None,
        };

        QuoteItem::new(
            activity.id.clone(),
            activity.name.clone(),
            EntityPrice::Activity(price),
            price_addons(&activity.addons, participants),
            vec![],
            leg,
            extras.to_vec(),
        )
    }

    /// Settings, bus plan and pickup location, once per request. `None` when
    /// transport was not requested.
    async fn transport_context(&self, request: &QuoteRequest) -> Option<TransportContext> {
        let extra = request.transport_extra()?;
        let settings = self.transport_settings().await;
        let plan = plan_buses(
            request.participant_count,
            extra.people_per_bus,
            settings.max_people_per_bus,
        );
        let pickup = locate(self.geocoder.as_ref(), extra.address.as_ref()).await;
        if pickup == Located::NotFound {
            warn!("Transport pickup address could not be geocoded");
        }

        Some(TransportContext {
            settings,
            plan,
            pickup,
        })
    }

    async fn transport_settings(&self) -> TransportSettings {
        if let Some(cached) = self.cache.cached_transport_settings().await {
            return (*cached).clone();
        }

        match queries::fetch_transport_settings(self.cms.as_ref()).await {
            Ok(Some(doc)) => {
                let settings = doc.merge_with(&self.transport_fallback);
                self.cache.store_transport_settings(settings.clone()).await;
                settings
            }
            Ok(None) => {
                warn!("No transport settings in CMS; using configured fallback");
                self.transport_fallback.clone()
            }
            Err(e) => {
                warn!("Failed to load transport settings: {}; using configured fallback", e);
                self.transport_fallback.clone()
            }
        }
    }

    /// Locations for activities that did not bring one, fetched in one
    /// concurrent batch. Only needed when transport is requested.
    async fn activity_locations(&self, request: &QuoteRequest) -> HashMap<String, ActivityLocation> {
        if request.transport_extra().is_none() {
            return HashMap::new();
        }

        let missing: Vec<String> = request
            .activities
            .iter()
            .filter(|a| a.location.is_none())
            .map(|a| a.id.clone())
            .collect();
        if missing.is_empty() {
            return HashMap::new();
        }

        queries::fetch_activity_locations(self.cms.as_ref(), &missing).await
    }
}

fn price_addons(addons: &[SelectedAddon], participants: u32) -> Vec<PricedLine> {
    addons
        .iter()
        .map(|addon| {
            price_line(
                &addon.id,
                &addon.name,
                addon.pricing.as_ref(),
                addon.count,
                participants,
            )
        })
        .collect()
}

/// Lines without pricing need an individual quote.
fn price_line(
    id: &str,
    name: &str,
    pricing: Option<&ItemPricing>,
    count: Option<u32>,
    participants: u32,
) -> PricedLine {
    let result = match pricing {
        Some(pricing) => calculate_item_price(pricing, count, participants),
        None => calculate_item_price(&ItemPricing::Individual, count, participants),
    };
    PricedLine {
        id: id.to_string(),
        name: name.to_string(),
        count,
        result,
    }
}
