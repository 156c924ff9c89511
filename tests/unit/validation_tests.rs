use tradebook_rs::prelude::*;

fn p(cents: i64) -> Price {
    Price::from_cents(cents)
}

// --- Original volume bounds ---

#[test]
fn test_original_volume_boundaries() {
    assert!(Tradable::order("ANN", "TGT", p(100), 0, Side::Buy).is_err());
    assert!(Tradable::order("ANN", "TGT", p(100), 1, Side::Buy).is_ok());
    assert!(Tradable::order("ANN", "TGT", p(100), 9_999, Side::Buy).is_ok());
    assert!(Tradable::order("ANN", "TGT", p(100), 10_000, Side::Buy).is_err());
}

// --- User code format ---

#[test]
fn test_user_code_boundaries() {
    for rejected in ["AB", "AB1", "ABCD", ""] {
        assert!(
            Tradable::order(rejected, "TGT", p(100), 10, Side::Buy).is_err(),
            "expected user '{rejected}' rejected"
        );
    }

    let accepted = Tradable::order("abc", "TGT", p(100), 10, Side::Buy).unwrap();
    assert_eq!(accepted.user(), "ABC");
}

// --- Product symbol format ---

#[test]
fn test_symbol_boundaries() {
    let mut venue = TradeBook::new();
    for rejected in ["", "ABCDEF", ".A", "A.", "A.BC"] {
        assert!(
            venue.add_product(rejected).is_err(),
            "expected symbol '{rejected}' rejected"
        );
    }
    for accepted in ["A", "ABCDE", "ABCD.E"] {
        assert!(
            venue.add_product(accepted).is_ok(),
            "expected symbol '{accepted}' accepted"
        );
    }
    assert_eq!(venue.products().product_count(), 3);
}

// --- Missing product and user routing failures ---

#[test]
fn test_order_for_unknown_product_is_rejected() {
    let mut venue = TradeBook::new();
    venue.init_users(&["ANN"]).unwrap();
    let result = venue.add_order("ANN", "TGT", p(10_000), 10, Side::Buy);
    assert!(matches!(result, Err(BookError::DataValidation(_))));
}

#[test]
fn test_order_for_unknown_user_is_rejected() {
    let mut venue = TradeBook::new();
    venue.add_product("TGT").unwrap();
    let result = venue.add_order("ANN", "TGT", p(10_000), 10, Side::Buy);
    assert!(result.is_err());
}

#[test]
fn test_unknown_user_lookup() {
    let venue = TradeBook::new();
    assert!(matches!(venue.user("ANN"), Err(BookError::UserNotFound(_))));
}

// --- Textual forms ---

#[test]
fn test_order_and_snapshot_text_forms() {
    let order = Tradable::order("AXE", "TGT", p(13_400), 50, Side::Sell).unwrap();
    assert!(order.to_string().starts_with(
        "AXE SELL order: TGT at $134.00, Orig Vol: 50, Rem Vol: 50, Fill Vol: 0, CXL Vol: 0, ID: "
    ));

    let snapshot = order.snapshot();
    assert!(snapshot.to_string().starts_with(
        "Product: TGT, Price: $134.00, OriginalVolume: 50, RemainingVolume: 50, CancelledVolume: 0, FilledVolume: 0, User: AXE, Side: SELL, Id: "
    ));
}

#[test]
fn test_quote_side_text_form() {
    let quote = Quote::new("TGT", p(9_900), 5, p(10_100), 5, "CCC").unwrap();
    let text = quote.side(Side::Buy).to_string();
    assert!(text.starts_with(
        "CCC BUY side quote for TGT: $99.00, Orig Vol: 5, Rem Vol: 5, Fill Vol: 0, CXL Vol: 0, ID: "
    ));
}

#[test]
fn test_book_dump_shape() {
    let mut venue = TradeBook::new();
    venue.init_users(&["ANN"]).unwrap();
    venue.add_product("TGT").unwrap();
    venue.add_order("ANN", "TGT", p(10_000), 10, Side::Buy).unwrap();

    let dump = venue
        .products()
        .get_product_book("TGT")
        .unwrap()
        .to_string();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines[0], "--------------------------------------------");
    assert_eq!(lines[1], "Product Book: TGT");
    assert_eq!(lines[2], "Side: BUY");
    assert_eq!(lines[3], "\t$100.00:");
    assert!(lines[4].starts_with("\t\tANN BUY order: TGT at $100.00"));
    assert_eq!(*lines.last().unwrap(), "--------------------------------------------");
}

#[test]
fn test_user_ledger_text_form() {
    let mut venue = TradeBook::new();
    venue.init_users(&["ANN"]).unwrap();
    venue.add_product("TGT").unwrap();
    venue.add_order("ANN", "TGT", p(10_000), 10, Side::Buy).unwrap();

    let text = venue.user("ANN").unwrap().to_string();
    assert!(text.starts_with("  User Id: ANN\n\tProduct: TGT, Price: $100.00"));
}

// --- Tradable ids ---

#[test]
fn test_id_shape_and_uniqueness() {
    let first = Tradable::order("ANN", "TGT", p(10_000), 10, Side::Buy).unwrap();
    let second = Tradable::order("ANN", "TGT", p(10_000), 10, Side::Buy).unwrap();

    assert!(first.id().starts_with("ANNTGT$100.00"));
    assert!(second.id().starts_with("ANNTGT$100.00"));
    assert_ne!(first.id(), second.id());
}

// --- Market banner ---

#[test]
fn test_market_banner_lines() {
    let buy = MarketSide::new(p(10_000), 40);
    let sell = MarketSide::new(p(10_100), 30);
    let banner = MarketTracker::format_banner("TGT", &buy, &sell, p(100));

    let lines: Vec<&str> = banner.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "*********** Current Market ***********");
    assert_eq!(lines[1], "* TGT $100.00x40 - $101.00x30 [$1.00]");
    assert_eq!(lines[2].chars().filter(|&c| c == '*').count(), lines[2].len());
    assert_eq!(lines[0].len(), lines[2].len());
}
