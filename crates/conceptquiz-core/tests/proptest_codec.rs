//! Property tests for the query-string codec.

use conceptquiz_core::query::{decode, encode, Cursor, QueryParams};
use proptest::prelude::*;

/// Keys are non-empty and unique; values may be empty. Neither contains
/// `&` or `=`.
fn arb_params() -> impl Strategy<Value = QueryParams> {
    prop::collection::btree_map("[a-z][a-zA-Z0-9_]{0,8}", "[a-zA-Z0-9_/.:% -]{0,16}", 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn decode_inverts_encode(params in arb_params()) {
        let decoded = decode(&encode(&params)).unwrap();
        prop_assert_eq!(decoded, params);
    }

    #[test]
    fn decode_accepts_path_prefix(params in arb_params()) {
        let url = format!("http://api.conceptnet.io/query?{}", encode(&params));
        prop_assert_eq!(decode(&url).unwrap(), params);
    }

    #[test]
    fn encoding_preserves_order(params in arb_params()) {
        let decoded = decode(&encode(&params)).unwrap();
        let original: Vec<_> = params.iter().collect();
        let round_tripped: Vec<_> = decoded.iter().collect();
        prop_assert_eq!(original, round_tripped);
    }

    #[test]
    fn cursor_reads_offset_and_limit(offset in 0u64..1_000_000, limit in 1u64..1_000) {
        let next_page = format!("/query?node=/c/en/cat&offset={offset}&limit={limit}");
        prop_assert_eq!(Cursor::from_next_page(&next_page).unwrap(), Cursor::new(offset, limit));
    }
}
