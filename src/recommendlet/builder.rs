use std::ops::RangeInclusive;

use url::form_urlencoded::Serializer;

use super::{Endpoint, RecommendletParams, MAX_RECOMMEND};
use crate::error::FetchError;

pub fn recommendlet_url(params: &RecommendletParams) -> String {
    build_url(Endpoint::Plain, params)
}

pub fn json_recommendlet_url(params: &RecommendletParams) -> String {
    build_url(Endpoint::Json, params)
}

/// Query order is fixed: the five required pairs, then item id, then rating.
pub fn build_url(endpoint: Endpoint, params: &RecommendletParams) -> String {
    let mut query = Serializer::new(String::new());
    query
        .append_pair("host", &params.host)
        .append_pair("port", &params.port.to_string())
        .append_pair("reg_name", &params.reg_name)
        .append_pair("external_userid", &params.external_user_id)
        .append_pair("max_recommend", &params.max_recommend.to_string());
    if let Some(item_id) = params.item_id() {
        query.append_pair("external_itemid", item_id);
    }
    if let Some(rating) = params.effective_rating() {
        query.append_pair("rating", &rating.to_string());
    }

    let host = params
        .authority_host()
        .map(|host| host.to_string())
        .unwrap_or_else(|_| params.host.clone());
    format!(
        "http://{}:{}{}?{}",
        host,
        params.port,
        endpoint.path(),
        query.finish()
    )
}

/// One rating-update url per rating in `ratings`, the links a recommendlet
/// offers under an item so the user can rate it.
///
/// Each url carries the item id and the default list size. A rating of zero
/// is left out of its url like any other falsy rating.
pub fn rating_urls(
    endpoint: Endpoint,
    params: &RecommendletParams,
    ratings: RangeInclusive<i32>,
) -> Result<Vec<(i32, String)>, FetchError> {
    params.validate()?;
    if params.item_id().is_none() {
        return Err(FetchError::InvalidParams(
            "rating links need an external item id".to_string(),
        ));
    }

    let base = params.clone().with_max_recommend(MAX_RECOMMEND);
    Ok(ratings
        .map(|rating| {
            let params = base.clone().with_rating(f64::from(rating));
            (rating, build_url(endpoint, &params))
        })
        .collect())
}
