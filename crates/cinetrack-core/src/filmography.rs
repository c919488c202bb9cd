use chrono::NaiveDate;
use cinetrack_models::{Credit, ListEntry};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::locale::Locale;
use crate::projection::Projection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreditSort {
    #[default]
    VoteDesc,
    VoteAsc,
    DateDesc,
    DateAsc,
    NameAsc,
}

impl FromStr for CreditSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "vote_desc" => Ok(CreditSort::VoteDesc),
            "vote_asc" => Ok(CreditSort::VoteAsc),
            "date_desc" => Ok(CreditSort::DateDesc),
            "date_asc" => Ok(CreditSort::DateAsc),
            "name_asc" => Ok(CreditSort::NameAsc),
            _ => Err(format!(
                "Invalid credit sort: {}. Use vote_desc, vote_asc, date_desc, date_asc or name_asc",
                s
            )),
        }
    }
}

/// A credit together with the user's entry for it, if there is one
#[derive(Debug, Clone, PartialEq)]
pub struct FilmographyItem<'a> {
    pub credit: &'a Credit,
    pub entry: Option<&'a ListEntry>,
}

pub fn compose_filmography<'a>(
    credits: &'a [Credit],
    projection: &'a Projection,
    sort: CreditSort,
    locale: &Locale,
) -> Vec<FilmographyItem<'a>> {
    let mut items: Vec<FilmographyItem<'a>> = credits
        .iter()
        .map(|credit| FilmographyItem {
            credit,
            entry: projection.get(credit.catalog_id),
        })
        .collect();

    items.sort_by(|a, b| compare(a.credit, b.credit, sort, locale));
    items
}

fn compare(a: &Credit, b: &Credit, sort: CreditSort, locale: &Locale) -> Ordering {
    match sort {
        CreditSort::VoteDesc => b.vote_average.total_cmp(&a.vote_average),
        CreditSort::VoteAsc => a.vote_average.total_cmp(&b.vote_average),
        CreditSort::DateDesc => release(b).cmp(&release(a)),
        CreditSort::DateAsc => release(a).cmp(&release(b)),
        CreditSort::NameAsc => locale.compare(&a.title, &b.title),
    }
}

/// Missing or unparseable dates count as the Unix epoch
fn release(credit: &Credit) -> NaiveDate {
    credit
        .release_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinetrack_models::{Document, MediaKind};
    use serde_json::json;

    fn credit(id: u64, title: &str, date: Option<&str>, vote: f64) -> Credit {
        Credit {
            catalog_id: id,
            media_kind: MediaKind::Movie,
            title: title.to_string(),
            character: None,
            release_date: date.map(str::to_string),
            poster_path: Some(format!("/{}.jpg", id)),
            vote_average: vote,
        }
    }

    fn credits() -> Vec<Credit> {
        vec![
            credit(1, "Kış Uykusu", Some("2014-05-16"), 7.9),
            credit(2, "Ahlat Ağacı", Some("2018-05-18"), 8.1),
            credit(3, "Bilinmeyen", None, 0.0),
            credit(4, "Ayla", Some("2017-10-27"), 8.1),
        ]
    }

    fn ids(items: &[FilmographyItem<'_>]) -> Vec<u64> {
        items.iter().map(|i| i.credit.catalog_id).collect()
    }

    #[test]
    fn test_sort_options() {
        let credits = credits();
        let projection = Projection::default();
        let tr = Locale::new("tr");

        assert_eq!(ids(&compose_filmography(&credits, &projection, CreditSort::VoteDesc, &tr)), vec![2, 4, 1, 3]);
        assert_eq!(ids(&compose_filmography(&credits, &projection, CreditSort::VoteAsc, &tr)), vec![3, 1, 2, 4]);
        assert_eq!(ids(&compose_filmography(&credits, &projection, CreditSort::DateDesc, &tr)), vec![2, 4, 1, 3]);
        assert_eq!(ids(&compose_filmography(&credits, &projection, CreditSort::DateAsc, &tr)), vec![3, 1, 4, 2]);
        assert_eq!(ids(&compose_filmography(&credits, &projection, CreditSort::NameAsc, &tr)), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_credits_are_annotated_with_list_entries() {
        let credits = credits();
        let projection = Projection::from_documents(&[Document::new(
            "d1",
            json!({"catalogId": 4, "mediaKind": "movie", "status": "completed", "title": "Ayla"})
                .as_object()
                .cloned()
                .unwrap(),
        )]);

        let items = compose_filmography(&credits, &projection, CreditSort::VoteDesc, &Locale::new("tr"));
        let annotated: Vec<u64> = items.iter().filter(|i| i.entry.is_some()).map(|i| i.credit.catalog_id).collect();
        assert_eq!(annotated, vec![4]);
        assert_eq!(items[1].entry.unwrap().document_id, "d1");
    }

    #[test]
    fn test_parse_credit_sort() {
        assert_eq!("date-desc".parse::<CreditSort>().unwrap(), CreditSort::DateDesc);
        assert!("rating".parse::<CreditSort>().is_err());
    }

    #[tokio::test]
    async fn test_fetched_credits_compose_against_list() {
        use crate::testing::FakeCatalog;
        use cinetrack_sources::CatalogClient;

        let catalog = FakeCatalog::default().with_credits(credits());
        let fetched = catalog.person_credits(1_245).await.unwrap();
        assert_eq!(catalog.calls(), 1);

        let projection = Projection::default();
        let items = compose_filmography(&fetched, &projection, CreditSort::DateDesc, &Locale::new("tr"));
        assert_eq!(ids(&items), vec![2, 4, 1, 3]);
        assert!(items.iter().all(|i| i.entry.is_none()));
    }
}
