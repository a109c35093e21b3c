use std::collections::BTreeMap;

use axum::Json;

use crate::models::stock::ScreeningFilters;

/// 内置筛选预设，供前端一键套用
pub fn screening_profiles() -> BTreeMap<&'static str, ScreeningFilters> {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "tech_growth",
        ScreeningFilters {
            sector: Some("Technology".to_string()),
            min_pe: Some(0.0),
            max_pe: Some(40.0),
            min_market_cap: Some(1e9),
            limit: Some(50),
            ..ScreeningFilters::default()
        },
    );
    profiles.insert(
        "large_gap",
        ScreeningFilters {
            min_gap: Some(20.0),
            limit: Some(50),
            ..ScreeningFilters::default()
        },
    );
    profiles.insert(
        "huge_gap",
        ScreeningFilters {
            min_gap: Some(50.0),
            limit: Some(30),
            ..ScreeningFilters::default()
        },
    );
    profiles.insert(
        "dividend_aristocrats",
        ScreeningFilters {
            min_dividend_yield: Some(3.0),
            limit: Some(50),
            ..ScreeningFilters::default()
        },
    );
    profiles.insert(
        "dividend_stocks",
        ScreeningFilters {
            min_dividend_yield: Some(2.0),
            limit: Some(50),
            ..ScreeningFilters::default()
        },
    );
    profiles.insert(
        "large_cap",
        ScreeningFilters {
            min_market_cap: Some(10e9),
            limit: Some(50),
            ..ScreeningFilters::default()
        },
    );
    profiles.insert(
        "small_cap",
        ScreeningFilters {
            min_market_cap: Some(300e6),
            max_market_cap: Some(2e9),
            limit: Some(50),
            ..ScreeningFilters::default()
        },
    );
    profiles.insert(
        "value_stocks",
        ScreeningFilters {
            min_pe: Some(0.0),
            max_pe: Some(15.0),
            min_market_cap: Some(1e9),
            limit: Some(50),
            ..ScreeningFilters::default()
        },
    );
    profiles
}

pub async fn get_profiles() -> Json<BTreeMap<&'static str, ScreeningFilters>> {
    Json(screening_profiles())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_cover_expected_presets() {
        let profiles = screening_profiles();
        for name in [
            "tech_growth",
            "large_gap",
            "huge_gap",
            "dividend_aristocrats",
            "dividend_stocks",
            "large_cap",
            "small_cap",
            "value_stocks",
        ] {
            assert!(profiles.contains_key(name), "missing profile {}", name);
        }
    }

    #[test]
    fn profiles_serialize_with_camel_case_bounds() {
        let json = serde_json::to_value(screening_profiles()).unwrap();
        assert_eq!(json["tech_growth"]["sector"], "Technology");
        assert_eq!(json["tech_growth"]["minPE"], 0.0);
        assert_eq!(json["large_gap"]["minGap"], 20.0);
        assert_eq!(json["small_cap"]["maxMarketCap"], 2e9);
        // 未设置的条件不应出现在 JSON 里
        assert!(json["large_gap"].get("minPE").is_none());
    }
}
