use portfolio_wasm::content::{
    render_ceramic_grid, render_statement_detail, render_statement_list, statement_detail_url,
    Ceramic, StatementDetail, StatementIndex,
};

const INDEX: &str = r#"{"statements":[{"id":1,"title":"Statement 2019"},{"id":"2","title":"On Clay"}]}"#;

#[test]
fn statement_select_then_back_restores_list() {
    let index: StatementIndex = serde_json::from_str(INDEX).unwrap();
    let list = render_statement_list(&index);
    assert_eq!(list.matches("class=\"statement-item\"").count(), 2);
    assert!(list.contains("data-statement-id=\"1\""));
    assert!(list.contains("<span class=\"number-span\">2019</span>"));

    let selected = &index.statements[0].id;
    assert_eq!(statement_detail_url(selected), "data/statements/1-statement.json");
    let detail: StatementDetail = serde_json::from_str(
        r#"{"id":1,"title":"Statement 2019","content":["First <b>para</b>.","Second."]}"#,
    )
    .unwrap();
    let page = render_statement_detail(&detail);
    assert!(page.contains("back-to-statements"));
    assert_eq!(page.matches("<p>").count(), 2);
    assert!(page.contains("&lt;b&gt;para&lt;/b&gt;"));

    assert_eq!(render_statement_list(&index), list);
}

#[test]
fn ceramic_grid_only_offers_buttons_for_carousels() {
    let ceramics: Vec<Ceramic> = serde_json::from_str(
        r#"[{"title":"Bowl","image":"c/bowl.jpg"},{"title":"Vase","images":["c/v1.jpg","c/v2.jpg"]},{"title":"Lost"}]"#,
    )
    .unwrap();
    let html = render_ceramic_grid(&ceramics);
    assert_eq!(html.matches("class=\"ceramic-item\"").count(), 2);
    assert_eq!(html.matches("ceramic-nav-btn").count(), 2);
    assert!(html.contains("data-ceramic-index=\"1\" data-direction=\"-1\""));
}
