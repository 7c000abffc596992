use chrono::NaiveDate;
use fueltrade::{
    CarrierId, CheckStatus, CommissionInput, DealContext, DealDraft, DealIssue, DealKind,
    DealMode, DealPricer, Decimal, Endpoint, EngineConfig, MockStores, ProductType, QuantityInput,
    SubmitMode, Warehouse, WarehouseId, WarehouseSnapshot,
};
use std::sync::Arc;

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn ymd(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn warehouse(id: &str, storage_per_ton: Option<&str>) -> Warehouse {
    Warehouse {
        id: WarehouseId::new(id),
        name: format!("Склад {}", id),
        storage_cost_per_ton: storage_per_ton.map(d),
        average_cost_per_kg: None,
    }
}

fn movement_draft(quantity: &str) -> DealDraft {
    DealDraft {
        kind: DealKind::Movement,
        mode: DealMode::Create,
        date: ymd(2024, 3, 10),
        product: ProductType::Kerosene,
        quantity: QuantityInput::Kilograms { kg: d(quantity) },
        supplier_id: None,
        buyer_id: None,
        source_warehouse_id: Some(WarehouseId::new("w1")),
        dest_warehouse_id: Some(WarehouseId::new("w2")),
        basis_id: None,
        basis: None,
        carrier_id: Some(CarrierId::new("k1")),
        destination: Some(Endpoint::Warehouse(WarehouseId::new("w2"))),
        purchase_selection: None,
        sale_selection: None,
        commission: CommissionInput::None,
        exchange_rate: None,
    }
}

fn ctx() -> DealContext {
    DealContext {
        supplier: None,
        buyer: None,
        source_warehouse: Some(warehouse("w1", None)),
        dest_warehouse: Some(warehouse("w2", Some("1250"))),
    }
}

/// 5000 kg at 58.5 on the deal date, 4000 kg at 59 today.
fn stocked_stores() -> MockStores {
    let w1 = WarehouseId::new("w1");
    MockStores::new()
        .with_snapshot(
            w1.clone(),
            ProductType::Kerosene,
            ymd(2024, 3, 10),
            WarehouseSnapshot::new(d("5000"), d("58.5")),
        )
        .with_snapshot(
            w1,
            ProductType::Kerosene,
            ymd(2024, 3, 20),
            WarehouseSnapshot::new(d("4000"), d("59")),
        )
        .with_rate(
            CarrierId::new("k1"),
            Endpoint::Warehouse(WarehouseId::new("w1")),
            Endpoint::Warehouse(WarehouseId::new("w2")),
            d("4.6875"),
        )
}

fn pricer(stores: MockStores) -> DealPricer {
    let stores = Arc::new(stores);
    DealPricer::new(
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores,
        EngineConfig::default(),
    )
}

#[tokio::test]
async fn test_movement_rollup_with_storage_and_delivery() {
    let pricer = pricer(stocked_stores());
    let evaluation = pricer
        .evaluate(&movement_draft("3200"), &ctx(), ymd(2024, 3, 20))
        .await
        .unwrap();

    let balance = evaluation.balance.as_ref().unwrap();
    assert_eq!(balance.usable_balance_kg, d("4000"));
    assert_eq!(balance.average_cost_per_kg, d("58.5"));
    assert_eq!(balance.status, CheckStatus::Ok);
    assert_eq!(balance.message, "остаток: 800 кг");

    // Costed at the historical weighted-average cost of the source.
    assert_eq!(evaluation.figures.purchase_amount, Some(d("187200")));
    assert_eq!(evaluation.figures.storage_cost, d("4000"));
    assert_eq!(evaluation.figures.delivery_cost, d("15000"));
    assert_eq!(evaluation.figures.total_cost, d("206200"));
    assert_eq!(evaluation.figures.cost_per_kg, d("64.4375"));
    // No sale side on an internal movement.
    assert_eq!(evaluation.figures.sale_amount, None);
    assert_eq!(evaluation.figures.profit, None);

    assert!(evaluation.issues(SubmitMode::Final).is_empty());
}

#[tokio::test]
async fn test_usable_balance_is_min_of_both_snapshots() {
    let w1 = WarehouseId::new("w1");
    let stores = MockStores::new()
        .with_snapshot(
            w1.clone(),
            ProductType::Kerosene,
            ymd(2024, 3, 10),
            WarehouseSnapshot::new(d("2000"), d("58.5")),
        )
        .with_snapshot(
            w1,
            ProductType::Kerosene,
            ymd(2024, 3, 20),
            WarehouseSnapshot::new(d("9000"), d("60")),
        );
    let pricer = pricer(stores);

    let evaluation = pricer
        .evaluate(&movement_draft("0"), &ctx(), ymd(2024, 3, 20))
        .await
        .unwrap();
    // A back-dated deal cannot borrow fuel that only arrived later.
    assert_eq!(evaluation.balance.unwrap().usable_balance_kg, d("2000"));
}

#[tokio::test]
async fn test_overdraw_blocks_final_but_not_draft() {
    let pricer = pricer(stocked_stores());
    let evaluation = pricer
        .evaluate(&movement_draft("4500"), &ctx(), ymd(2024, 3, 20))
        .await
        .unwrap();

    let balance = evaluation.balance.as_ref().unwrap();
    assert_eq!(balance.status, CheckStatus::Error);
    assert!(balance.message.contains("-500"));

    let issues = evaluation.issues(SubmitMode::Final);
    assert_eq!(issues.len(), 1);
    assert!(matches!(issues[0], DealIssue::InsufficientBalance { .. }));
    assert!(evaluation.issues(SubmitMode::Draft).is_empty());
}

#[tokio::test]
async fn test_editing_adds_back_original_quantity() {
    let pricer = pricer(stocked_stores());
    let mut draft = movement_draft("4500");
    draft.mode = DealMode::Edit {
        original_quantity_kg: d("3000"),
    };

    let evaluation = pricer.evaluate(&draft, &ctx(), ymd(2024, 3, 20)).await.unwrap();
    let balance = evaluation.balance.unwrap();
    // min(5000, 4000) + 3000 already committed by this deal.
    assert_eq!(balance.usable_balance_kg, d("7000"));
    assert_eq!(balance.status, CheckStatus::Ok);
}

#[tokio::test]
async fn test_empty_warehouse_reports_empty_before_missing_cost() {
    let pricer = pricer(MockStores::new());
    let evaluation = pricer
        .evaluate(&movement_draft("100"), &ctx(), ymd(2024, 3, 20))
        .await
        .unwrap();

    let balance = evaluation.balance.unwrap();
    assert_eq!(balance.status, CheckStatus::Error);
    assert_eq!(balance.message, "склад пуст");
}

#[tokio::test]
async fn test_average_cost_falls_back_to_stored_warehouse_cost() {
    let w1 = WarehouseId::new("w1");
    let stores = MockStores::new()
        .with_snapshot(
            w1.clone(),
            ProductType::Kerosene,
            ymd(2024, 3, 10),
            WarehouseSnapshot::new(d("5000"), Decimal::zero()),
        )
        .with_snapshot(
            w1,
            ProductType::Kerosene,
            ymd(2024, 3, 20),
            WarehouseSnapshot::new(d("5000"), Decimal::zero()),
        );
    let pricer = pricer(stores);

    let mut context = ctx();
    context.source_warehouse = Some(Warehouse {
        average_cost_per_kg: Some(d("59.2")),
        ..warehouse("w1", None)
    });

    let evaluation = pricer
        .evaluate(&movement_draft("1000"), &context, ymd(2024, 3, 20))
        .await
        .unwrap();
    let balance = evaluation.balance.unwrap();
    assert_eq!(balance.average_cost_per_kg, d("59.2"));
    assert_eq!(evaluation.figures.purchase_amount, Some(d("59200")));
}
