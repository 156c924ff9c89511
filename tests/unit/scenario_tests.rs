//! End-to-end scenarios driven through the engine context.

use tradebook_rs::prelude::*;

fn venue_with(users: &[&str], products: &[&str]) -> TradeBook {
    let mut venue = TradeBook::new();
    venue.init_users(users).unwrap();
    for product in products {
        venue.add_product(product).unwrap();
    }
    venue
}

// --- Scenario: exact cross, full fill ---

#[test]
fn test_exact_cross_full_fill() {
    let mut venue = venue_with(&["AAA", "BBB", "OBS"], &["TGT"]);
    venue.subscribe_current_market("TGT", "OBS").unwrap();

    let p100 = venue.parse_price("100.00").unwrap();
    let sell = venue.add_order("AAA", "TGT", p100, 50, Side::Sell).unwrap();
    let buy = venue.add_order("BBB", "TGT", p100, 50, Side::Buy).unwrap();

    let sell_final = venue.user("AAA").unwrap().tradable(&sell.id).unwrap().clone();
    let buy_final = venue.user("BBB").unwrap().tradable(&buy.id).unwrap().clone();
    assert_eq!(sell_final.filled_volume, 50);
    assert_eq!(sell_final.remaining_volume, 0);
    assert_eq!(buy_final.filled_volume, 50);
    assert_eq!(buy_final.remaining_volume, 0);

    let book = venue.products().get_product_book("TGT").unwrap();
    assert!(book.buy_side().is_empty());
    assert!(book.sell_side().is_empty());

    let (buy_mkt, sell_mkt) = venue.user("OBS").unwrap().current_market("TGT").unwrap();
    let width = sell_mkt.price().subtract(buy_mkt.price());
    assert_eq!(
        format!("{buy_mkt} - {sell_mkt} [{width}]"),
        "$0.00x0 - $0.00x0 [$0.00]"
    );
}

// --- Scenario: no cross ---

#[test]
fn test_no_cross_rests() {
    let mut venue = venue_with(&["AAA", "BBB"], &["TGT"]);

    let p101 = venue.price(10_100);
    let p100 = venue.price(10_000);
    venue.add_order("AAA", "TGT", p101, 10, Side::Sell).unwrap();
    venue.add_order("BBB", "TGT", p100, 10, Side::Buy).unwrap();

    let book = venue.products().get_product_book("TGT").unwrap();
    assert_eq!(book.buy_side().top_price(), Some(p100));
    assert_eq!(book.buy_side().top_volume(), 10);
    assert_eq!(book.sell_side().top_price(), Some(p101));
    assert_eq!(book.sell_side().top_volume(), 10);
    assert_eq!(p101.subtract(p100).to_string(), "$1.00");
}

// --- Scenario: pro-rata partial ---

#[test]
fn test_pro_rata_partial_fill() {
    let mut venue = venue_with(&["AAA", "BBB", "CCC", "DDD"], &["TGT"]);

    let p100 = venue.price(10_000);
    let a = venue.add_order("AAA", "TGT", p100, 40, Side::Sell).unwrap();
    let b = venue.add_order("BBB", "TGT", p100, 40, Side::Sell).unwrap();
    let c = venue.add_order("CCC", "TGT", p100, 20, Side::Sell).unwrap();

    let buy = venue.add_order("DDD", "TGT", p100, 30, Side::Buy).unwrap();

    // ceil shares 12 / 12 / 6 leave remainings 28 / 28 / 14.
    for (owner, id, filled, remaining) in [
        ("AAA", &a.id, 12, 28),
        ("BBB", &b.id, 12, 28),
        ("CCC", &c.id, 6, 14),
    ] {
        let snap = venue.user(owner).unwrap().tradable(id).unwrap().clone();
        assert_eq!(snap.filled_volume, filled, "filled for {owner}");
        assert_eq!(snap.remaining_volume, remaining, "remaining for {owner}");
    }

    let buy_final = venue.user("DDD").unwrap().tradable(&buy.id).unwrap().clone();
    assert_eq!(buy_final.filled_volume, 30);
    assert_eq!(buy_final.remaining_volume, 0);

    let book = venue.products().get_product_book("TGT").unwrap();
    assert_eq!(book.sell_side().top_volume(), 70);
}

// --- Scenario: sweep plus partial across levels ---

#[test]
fn test_sweep_plus_partial_across_levels() {
    let mut venue = venue_with(&["AAA", "BBB", "CCC"], &["TGT"]);

    let p100 = venue.price(10_000);
    let p101 = venue.price(10_100);
    let a = venue.add_order("AAA", "TGT", p100, 10, Side::Sell).unwrap();
    let b = venue.add_order("BBB", "TGT", p101, 20, Side::Sell).unwrap();

    let buy = venue.add_order("CCC", "TGT", p101, 25, Side::Buy).unwrap();

    let a_final = venue.user("AAA").unwrap().tradable(&a.id).unwrap().clone();
    assert_eq!(a_final.filled_volume, 10);

    let b_final = venue.user("BBB").unwrap().tradable(&b.id).unwrap().clone();
    assert_eq!(b_final.filled_volume, 15);
    assert_eq!(b_final.remaining_volume, 5);

    let buy_final = venue.user("CCC").unwrap().tradable(&buy.id).unwrap().clone();
    assert_eq!(buy_final.filled_volume, 25);
    assert_eq!(buy_final.remaining_volume, 0);
}

// --- Scenario: quote replacement ---

#[test]
fn test_quote_replacement() {
    let mut venue = venue_with(&["CCC"], &["TGT"]);

    let (bid1, ask1) = (venue.price(9_900), venue.price(10_100));
    let (old_buy, old_sell) = venue.add_quote("CCC", "TGT", bid1, 5, ask1, 5).unwrap();

    let (bid2, ask2) = (venue.price(9_800), venue.price(10_200));
    venue.add_quote("CCC", "TGT", bid2, 7, ask2, 7).unwrap();

    let book = venue.products().get_product_book("TGT").unwrap();
    assert_eq!(book.buy_side().top_price(), Some(bid2));
    assert_eq!(book.buy_side().top_volume(), 7);
    assert_eq!(book.sell_side().top_price(), Some(ask2));
    assert_eq!(book.sell_side().top_volume(), 7);
    assert_eq!(book.buy_side().depth().len(), 1);
    assert_eq!(book.sell_side().depth().len(), 1);

    let ledger = venue.user("CCC").unwrap();
    assert_eq!(ledger.tradable(&old_buy.id).unwrap().cancelled_volume, 5);
    assert_eq!(ledger.tradable(&old_sell.id).unwrap().cancelled_volume, 5);
}

// --- Scenario: quote that crosses on arrival ---

#[test]
fn test_crossing_quote_fills_reach_the_ledger() {
    let mut venue = venue_with(&["AAA", "MMM"], &["TGT"]);

    let p100 = venue.price(10_000);
    let resting = venue.add_order("AAA", "TGT", p100, 5, Side::Sell).unwrap();

    // MMM's bid crosses the resting offer on arrival; its sell side rests.
    let ask = venue.price(10_200);
    let (quote_buy, quote_sell) = venue.add_quote("MMM", "TGT", p100, 5, ask, 5).unwrap();

    let ledger = venue.user("MMM").unwrap();
    let buy_final = ledger.tradable(&quote_buy.id).unwrap();
    assert_eq!(buy_final.filled_volume, 5);
    assert_eq!(buy_final.remaining_volume, 0);
    let sell_final = ledger.tradable(&quote_sell.id).unwrap();
    assert_eq!(sell_final.filled_volume, 0);
    assert_eq!(sell_final.remaining_volume, 5);

    let resting_final = venue.user("AAA").unwrap().tradable(&resting.id).unwrap();
    assert_eq!(resting_final.filled_volume, 5);
    assert_eq!(resting_final.remaining_volume, 0);

    let book = venue.products().get_product_book("TGT").unwrap();
    assert!(book.buy_side().is_empty());
    assert_eq!(book.sell_side().top_price(), Some(ask));
    assert_eq!(book.sell_side().top_volume(), 5);
}

// --- Scenario: cancel and publish ---

#[test]
fn test_cancel_and_publish() {
    let mut venue = venue_with(&["DDD"], &["TGT"]);
    venue.subscribe_current_market("TGT", "DDD").unwrap();

    let p100 = venue.price(10_000);
    let snapshot = venue.add_order("DDD", "TGT", p100, 10, Side::Buy).unwrap();
    let cancelled = venue.cancel(&snapshot).unwrap().unwrap();
    assert_eq!(cancelled.remaining_volume, 0);
    assert_eq!(cancelled.cancelled_volume, 10);

    let ledger = venue.user("DDD").unwrap();
    let mirrored = ledger.tradable(&snapshot.id).unwrap();
    assert_eq!(mirrored.remaining_volume, 0);
    assert_eq!(mirrored.cancelled_volume, 10);
    assert_eq!(ledger.current_markets(), "TGT $0.00x0 - $0.00x0\n");
}

// --- Cancel of an unknown id is a silent miss ---

#[test]
fn test_cancel_unknown_id_returns_none() {
    let mut venue = venue_with(&["DDD"], &["TGT"]);
    let p100 = venue.price(10_000);
    let snapshot = venue.add_order("DDD", "TGT", p100, 10, Side::Buy).unwrap();

    venue.cancel(&snapshot).unwrap().unwrap();
    assert!(venue.cancel(&snapshot).unwrap().is_none());
}

// --- Publication fans out in subscription order and honors unsubscribe ---

#[test]
fn test_subscription_lifecycle() {
    let mut venue = venue_with(&["ANN", "BOB"], &["TGT"]);
    venue.subscribe_current_market("TGT", "ANN").unwrap();
    venue.subscribe_current_market("TGT", "BOB").unwrap();

    let p100 = venue.price(10_000);
    venue.add_order("ANN", "TGT", p100, 10, Side::Buy).unwrap();
    assert!(venue.user("ANN").unwrap().current_market("TGT").is_some());
    assert!(venue.user("BOB").unwrap().current_market("TGT").is_some());

    venue.unsubscribe_current_market("TGT", "BOB").unwrap();
    let p101 = venue.price(10_100);
    venue.add_order("ANN", "TGT", p101, 5, Side::Buy).unwrap();

    let ann_view = venue.user("ANN").unwrap().current_market("TGT").unwrap();
    let bob_view = venue.user("BOB").unwrap().current_market("TGT").unwrap();
    assert_eq!(ann_view.0.to_string(), "$101.00x5");
    // BOB stopped receiving updates after unsubscribing.
    assert_eq!(bob_view.0.to_string(), "$100.00x10");
}

// --- Multi-product isolation ---

#[test]
fn test_books_are_isolated_per_symbol() {
    let mut venue = venue_with(&["ANN", "BOB"], &["TGT", "WMT"]);

    let p100 = venue.price(10_000);
    venue.add_order("ANN", "TGT", p100, 10, Side::Sell).unwrap();
    venue.add_order("BOB", "WMT", p100, 10, Side::Buy).unwrap();

    let tgt = venue.products().get_product_book("TGT").unwrap();
    let wmt = venue.products().get_product_book("WMT").unwrap();
    assert_eq!(tgt.sell_side().top_volume(), 10);
    assert!(tgt.buy_side().is_empty());
    assert_eq!(wmt.buy_side().top_volume(), 10);
    assert!(wmt.sell_side().is_empty());
}
