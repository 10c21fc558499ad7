//! Data behind the daily menu and the special offer cards.

use burgerhaus_types::catalog::{Allergen, Burger, SpecialOffer};
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::warn;

use crate::api::ApiClient;
use crate::error::{WebError, WebResult};

pub const BURGER_IMAGES: &str = "burgers";
pub const OFFER_IMAGES: &str = "specials";
pub const OFFERS_SHOWN: usize = 3;

/// Monday to Sunday of the week containing `day`.
pub fn week_dates(day: NaiveDate) -> Vec<NaiveDate> {
    day.week(Weekday::Mon).first_day().iter_days().take(7).collect()
}

/// `DD.MM.`, the label of a weekday tab.
pub fn day_label(day: NaiveDate) -> String {
    day.format("%d.%m.").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuCard {
    pub date: NaiveDate,
    pub burger: Burger,
    pub allergens: Vec<Allergen>,
    pub image_url: Option<String>,
}

impl MenuCard {
    /// Allergen acronyms, comma separated.
    pub fn allergen_label(&self) -> String {
        self.allergens
            .iter()
            .map(|a| a.acronym.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One card per burger scheduled on `date`. Entries whose burger no longer
/// exists are skipped.
pub async fn daily_menu(api: &ApiClient, date: NaiveDate) -> WebResult<Vec<MenuCard>> {
    let entries = api.menu_for_date(date).await?;
    let mut cards = Vec::with_capacity(entries.len());
    for entry in entries {
        let burger = match api.burger(entry.burger_id).await {
            Ok(burger) => burger,
            Err(WebError::NotFound(_)) => {
                warn!(burger_id = entry.burger_id, "menu entry without burger");
                continue;
            }
            Err(e) => return Err(e),
        };
        let allergens = api.allergens_for_burger(burger.id).await?;
        let image_url = burger
            .filename
            .as_deref()
            .map(|file| api.config().image_url(Some(BURGER_IMAGES), file));
        cards.push(MenuCard {
            date,
            burger,
            allergens,
            image_url,
        });
    }
    Ok(cards)
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferCard {
    pub offer: SpecialOffer,
    pub burger: Option<Burger>,
    pub image_url: Option<String>,
}

impl OfferCard {
    /// `Valid: D.M.YYYY to D.M.YYYY`
    pub fn validity(&self) -> String {
        format!(
            "Valid: {} to {}",
            short_date(self.offer.start_date),
            short_date(self.offer.end_date)
        )
    }
}

fn short_date(date: NaiveDate) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}

/// Earliest starting offers first, at most three.
pub fn select_offers(mut offers: Vec<SpecialOffer>) -> Vec<SpecialOffer> {
    offers.sort_by_key(|offer| offer.start_date);
    offers.truncate(OFFERS_SHOWN);
    offers
}

/// Offer cards for `date`. The offer's own image wins over the image of its
/// burger.
pub async fn top_offers(api: &ApiClient, date: NaiveDate) -> WebResult<Vec<OfferCard>> {
    let offers = select_offers(api.special_offers(date).await?);
    let mut cards = Vec::with_capacity(offers.len());
    for offer in offers {
        let burger = match offer.burger_id {
            Some(id) => match api.burger(id).await {
                Ok(burger) => Some(burger),
                Err(WebError::NotFound(_)) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };
        let image_url = match (&offer.filename, &burger) {
            (Some(file), _) => Some(api.config().image_url(Some(OFFER_IMAGES), file)),
            (None, Some(Burger {
                filename: Some(file),
                ..
            })) => Some(api.config().image_url(Some(BURGER_IMAGES), file)),
            _ => None,
        };
        cards.push(OfferCard {
            offer,
            burger,
            image_url,
        });
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn offer(id: i32, start: NaiveDate) -> SpecialOffer {
        SpecialOffer {
            id,
            offer_name: format!("offer {id}"),
            description: String::new(),
            price: BigDecimal::from(5),
            start_date: start,
            end_date: date(2024, 12, 31),
            burger_id: None,
            filename: None,
        }
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-06-02 is a Sunday
        let week = week_dates(date(2024, 6, 2));
        assert_eq!(week.first(), Some(&date(2024, 5, 27)));
        assert_eq!(week.last(), Some(&date(2024, 6, 2)));
        assert_eq!(week.len(), 7);
        assert_eq!(day_label(week[0]), "27.05.");
    }

    #[test]
    fn test_select_offers() {
        let offers = vec![
            offer(1, date(2024, 6, 4)),
            offer(2, date(2024, 6, 1)),
            offer(3, date(2024, 6, 3)),
            offer(4, date(2024, 6, 2)),
        ];
        let ids: Vec<i32> = select_offers(offers).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 4, 3]);
    }

    #[test]
    fn test_offer_validity_label() {
        let card = OfferCard {
            offer: offer(1, date(2024, 6, 1)),
            burger: None,
            image_url: None,
        };
        assert_eq!(card.validity(), "Valid: 1.6.2024 to 31.12.2024");
    }
}
