use std::net::SocketAddr;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;

use configs::{AppConfig, DatabaseConfig};
use models::{order, order_item, product, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use server::{routes, startup};

struct TestApp {
    base_url: String,
    db: DatabaseConnection,
    // dropped with the app; removes the database file
    _dir: TempDir,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn start_server(seed: bool) -> anyhow::Result<TestApp> {
    let dir = tempfile::tempdir()?;
    let mut cfg = AppConfig::default();
    cfg.database = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("e2e.db").display()),
        max_connections: 4,
        ..DatabaseConfig::default()
    };
    cfg.seed.enabled = seed;

    let state = startup::prepare_state(&cfg).await?;
    let db = state.db.clone();
    let app: Router = routes::build_router(state, startup::build_cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url: format!("http://{}:{}", addr.ip(), addr.port()), db, _dir: dir })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

/// One pending order holding a single unit of `product_id`.
async fn place_order(db: &DatabaseConnection, product_id: i32) -> anyhow::Result<()> {
    let p = product::Entity::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product {product_id} missing"))?;
    let buyer = user::create(db, "Comprador", "comprador@exemplo.com", "x", "").await?;
    let o = order::ActiveModel {
        order_date: Set(chrono::Utc::now().into()),
        status: Set(order::OrderStatus::Pending),
        total_amount: Set(p.price),
        user_id: Set(buyer.id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    order_item::ActiveModel {
        quantity: Set(1),
        unit_price: Set(p.price),
        subtotal: Set(p.price),
        order_id: Set(o.id),
        product_id: Set(p.id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

fn mouse_gamer(category_id: i64) -> Value {
    json!({
        "name": "Mouse Gamer",
        "description": "Mouse óptico 6400dpi",
        "price": 129.90,
        "stock": 20,
        "imageUrl": "",
        "categoryId": category_id
    })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let res = client().get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_create_product_denormalizes_category() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let res = c.post(app.url("/api/products")).json(&mouse_gamer(1)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("location header");
    let body = res.json::<Value>().await?;
    assert_eq!(body["categoryName"], "Eletrônicos");
    assert_eq!(body["stock"], 20);
    assert_eq!(location, format!("/api/products/{}", body["id"]));

    let fetched = c.get(app.url(&location)).send().await?;
    assert_eq!(fetched.status(), HttpStatusCode::OK);
    assert_eq!(fetched.json::<Value>().await?["name"], "Mouse Gamer");

    let res = c.post(app.url("/api/products")).json(&mouse_gamer(9999)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"message": "Categoria não encontrada"}));
    Ok(())
}

#[tokio::test]
async fn e2e_price_window_pagination() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let res = client()
        .get(app.url("/api/products?minPrice=100&maxPrice=200&page=1&pageSize=2"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    let items = body["items"].as_array().expect("items array");
    assert!(items.len() <= 2);
    for item in items {
        let price = item["price"].as_f64().expect("numeric price");
        assert!((100.0..=200.0).contains(&price), "price {price} out of range");
    }
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["totalItems"], 2);
    assert_eq!(body["totalPages"], 1);
    Ok(())
}

#[tokio::test]
async fn e2e_non_positive_paging_falls_back_to_defaults() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let body = client()
        .get(app.url("/api/products?page=0&pageSize=-3"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["totalItems"], 9);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(9));
    Ok(())
}

#[tokio::test]
async fn e2e_missing_ids_are_404() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let res = c.get(app.url("/api/products/4242")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["message"], "Produto com ID 4242 não encontrado");

    let res = c.get(app.url("/api/categories/77")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["message"], "Categoria com ID 77 não encontrada");

    let res = c.get(app.url("/api/products/category/77")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(app.url("/api/categories/77")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_category_lifecycle() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();

    let res = c
        .post(app.url("/api/categories"))
        .json(&json!({"name": "Esportes", "description": "Artigos esportivos"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["productCount"], 0);
    let id = created["id"].as_i64().expect("id");

    let res = c
        .post(app.url("/api/categories"))
        .json(&json!({"name": "ESPORTES", "description": "duplicada"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Já existe uma categoria com este nome");

    let res = c
        .put(app.url(&format!("/api/categories/{id}")))
        .json(&json!({"name": "Esportes e Lazer", "description": "Artigos esportivos"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = c.post(app.url("/api/products")).json(&mouse_gamer(id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let product_id = res.json::<Value>().await?["id"].as_i64().expect("id");

    let res = c.delete(app.url(&format!("/api/categories/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?["message"],
        "Não é possível excluir uma categoria que possui produtos"
    );

    let res = c.delete(app.url(&format!("/api/products/{product_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(app.url(&format!("/api/categories/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let list = c.get(app.url("/api/categories")).send().await?.json::<Value>().await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_bad_input_is_400_with_message() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let res = c
        .post(app.url("/api/products"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert!(res.json::<Value>().await?["message"].is_string());

    let mut bad_url = mouse_gamer(1);
    bad_url["imageUrl"] = json!("not a url");
    let res = c.post(app.url("/api/products")).json(&bad_url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "URL da imagem inválida");

    let res = c.get(app.url("/api/products/abc")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_category_products_and_diagnostics() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();

    let body = c.get(app.url("/api/categories/2/products")).send().await?.json::<Value>().await?;
    assert_eq!(body["name"], "Livros");
    assert_eq!(body["products"].as_array().map(Vec::len), Some(2));

    let tree = c.get(app.url("/api/test/categories")).send().await?.json::<Value>().await?;
    assert_eq!(tree.as_array().map(Vec::len), Some(4));
    let products = c.get(app.url("/api/test/products")).send().await?.json::<Value>().await?;
    assert_eq!(products[0]["category"]["name"], "Eletrônicos");
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_and_metrics_exposed() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = client();

    let doc = c.get(app.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(doc.status(), HttpStatusCode::OK);
    assert!(doc.json::<Value>().await?["paths"]["/api/products"].is_object());

    c.get(app.url("/api/categories")).send().await?;
    let text = c.get(app.url("/metrics")).send().await?.text().await?;
    assert!(text.contains("catalog_http_requests_total"));
    Ok(())
}

#[tokio::test]
async fn e2e_empty_price_bounds_are_ignored() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let res = client()
        .get(app.url("/api/products?search=&minPrice=&maxPrice=200"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    // Clean Code, Design Patterns, Camiseta, Calça Jeans, Luminária, Quadro
    assert_eq!(body["totalItems"], 6);
    for item in body["items"].as_array().expect("items array") {
        assert!(item["price"].as_f64().expect("numeric price") <= 200.0);
    }
    Ok(())
}

#[tokio::test]
async fn e2e_update_product_with_unknown_category_is_400() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = client();
    let res = c.put(app.url("/api/products/1")).json(&mouse_gamer(9999)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"message": "Categoria não encontrada"}));

    let unchanged = c.get(app.url("/api/products/1")).send().await?.json::<Value>().await?;
    assert_eq!(unchanged["name"], "Smartphone XYZ");

    let res = c.put(app.url("/api/products/4242")).json(&mouse_gamer(1)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_delete_ordered_product_is_400() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    place_order(&app.db, 2).await?;
    let c = client();

    let res = c.delete(app.url("/api/products/2")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?["message"],
        "Não é possível excluir um produto que está em pedidos"
    );
    let still_there = c.get(app.url("/api/products/2")).send().await?;
    assert_eq!(still_there.status(), HttpStatusCode::OK);

    let res = c.delete(app.url("/api/products/3")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    Ok(())
}
