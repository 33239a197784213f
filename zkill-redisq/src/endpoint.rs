//! Request URL construction for RedisQ.

use url::Url;

use crate::error::PollError;

/// Query parameter carrying the time-to-wait hint in seconds
pub const TTW_PARAM: &str = "ttw";
/// Query parameter identifying the client's queue
pub const QUEUE_ID_PARAM: &str = "queueID";

/// Build the request URL for `endpoint` with the given parameters.
///
/// `ttw` is always set, `queueID` only when `queue_id` is non-empty. Any other
/// query parameters already present on the endpoint are kept; existing `ttw` and
/// `queueID` values are replaced.
pub fn build_url(endpoint: &str, time_to_wait: u32, queue_id: &str) -> Result<String, PollError> {
    let mut url = Url::parse(endpoint).map_err(|source| PollError::Url {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TTW_PARAM && key != QUEUE_ID_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear().extend_pairs(retained);
        query.append_pair(TTW_PARAM, &time_to_wait.to_string());
        if !queue_id.is_empty() {
            query.append_pair(QUEUE_ID_PARAM, queue_id);
        }
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn query_of(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_default_parameters() {
        let url = build_url("https://redisq.zkillboard.com/listen.php", 10, "").unwrap();
        assert_eq!(url, "https://redisq.zkillboard.com/listen.php?ttw=10");
    }

    #[test]
    fn test_queue_id_is_encoded() {
        let url = build_url("https://redisq.zkillboard.com/listen.php", 5, "my app&co").unwrap();
        assert_eq!(
            url,
            "https://redisq.zkillboard.com/listen.php?ttw=5&queueID=my+app%26co"
        );
    }

    #[test]
    fn test_existing_parameters_are_kept_and_replaced() {
        let url = build_url("http://localhost:8080/listen.php?ttw=1&foo=bar", 3, "q").unwrap();
        assert_eq!(
            query_of(&url),
            vec![
                ("foo".to_string(), "bar".to_string()),
                ("ttw".to_string(), "3".to_string()),
                ("queueID".to_string(), "q".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        match build_url("not a url", 10, "") {
            Err(PollError::Url { endpoint, source }) => {
                assert_eq!(endpoint, "not a url");
                assert_eq!(source, url::ParseError::RelativeUrlWithoutBase);
            }
            other => panic!("Expected URL error, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_ttw_always_present(ttw in any::<u32>(), queue_id in ".*") {
            let url = build_url("https://redisq.zkillboard.com/listen.php", ttw, &queue_id).unwrap();
            let ttw_values: Vec<_> = query_of(&url)
                .into_iter()
                .filter(|(k, _)| k == TTW_PARAM)
                .map(|(_, v)| v)
                .collect();
            prop_assert_eq!(ttw_values, vec![ttw.to_string()]);
        }

        #[test]
        fn prop_queue_id_present_iff_non_empty(queue_id in ".*") {
            let url = build_url("https://redisq.zkillboard.com/listen.php", 10, &queue_id).unwrap();
            let queue_values: Vec<_> = query_of(&url)
                .into_iter()
                .filter(|(k, _)| k == QUEUE_ID_PARAM)
                .map(|(_, v)| v)
                .collect();

            if queue_id.is_empty() {
                prop_assert!(queue_values.is_empty());
            } else {
                prop_assert_eq!(queue_values, vec![queue_id]);
            }
        }
    }
}
