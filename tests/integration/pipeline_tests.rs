//! Full pipeline runs against a mock catalog site

use crate::common::{collection_page, create_test_config, product_page, read_products};
use catalog_scraper::output::PriceRange;
use catalog_scraper::{Coordinator, ProductRecord, PRICE_NOT_AVAILABLE};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, route: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_single_collection() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/collections/shirts",
        collection_page(&["/products/blue-shirt", "/products/mystery", "/products/blue-shirt"]),
    )
    .await;

    mount_html(
        &mock_server,
        "/products/blue-shirt",
        product_page(
            Some("Blue Shirt"),
            Some(&format!("{}/cdn/blue.png?v=1", base_url)),
            Some("A comfortable shirt"),
            Some("$29.99"),
        ),
    )
    .await;

    // Missing og:image: must be dropped
    mount_html(
        &mock_server,
        "/products/mystery",
        product_page(Some("Mystery"), None, Some("Unknown"), Some("$1.00")),
    )
    .await;

    mount_image(&mock_server, "/cdn/blue.png", b"blue-png").await;

    let config = create_test_config(&base_url, &["/collections/shirts"], temp.path());
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Run failed");

    let products = read_products(&coordinator.layout().products_path());
    assert_eq!(products.len(), 1);

    let product = &products[0];
    assert_eq!(product.name(), "Blue Shirt");
    assert_eq!(product.price(), "$29.99");
    assert_eq!(product.description(), "A comfortable shirt");
    assert_eq!(product.url(), format!("{}/products/blue-shirt", base_url));
    assert_eq!(product.image_url(), format!("{}/cdn/blue.png?v=1", base_url));

    let local = product.local_image_path().expect("Image should be downloaded");
    assert_eq!(std::fs::read(temp.path().join(local)).unwrap(), b"blue-png");

    assert_eq!(summary.total_products, 1);
    assert_eq!(summary.images_downloaded, 1);
    assert_eq!(summary.product_urls_found, 2);
    assert_eq!(summary.products_dropped, 1);
    assert_eq!(summary.collections_with_products, 1);
    assert_eq!(
        summary.price_range,
        Some(PriceRange {
            min: 29.99,
            max: 29.99
        })
    );
    assert_eq!(
        summary.output_path.as_deref(),
        Some(coordinator.layout().products_path().as_path())
    );
}

#[tokio::test]
async fn test_failed_collection_does_not_abort_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/collections/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    mount_html(
        &mock_server,
        "/collections/hats",
        collection_page(&["/products/hat"]),
    )
    .await;

    mount_html(
        &mock_server,
        "/products/hat",
        product_page(
            Some("Hat"),
            Some(&format!("{}/cdn/hat", base_url)),
            Some("Warm"),
            None,
        ),
    )
    .await;

    mount_image(&mock_server, "/cdn/hat", b"hat").await;

    let config = create_test_config(
        &base_url,
        &["/collections/broken", "/collections/hats"],
        temp.path(),
    );
    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.expect("Run failed");

    assert_eq!(summary.collections_total, 2);
    assert_eq!(summary.collections_failed, 1);
    assert_eq!(summary.collections_with_products, 1);
    assert_eq!(summary.total_products, 1);
    assert_eq!(summary.price_range, None);

    let products = read_products(&coordinator.layout().products_path());
    assert_eq!(products[0].price(), PRICE_NOT_AVAILABLE);
    assert!(coordinator.layout().image_path("Hat.jpg").is_file());
}

#[tokio::test]
async fn test_empty_collection_is_not_retried() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/collections/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(collection_page(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &["/collections/empty"], temp.path());
    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.expect("Run failed");

    assert_eq!(summary.collections_empty, 1);
    assert_eq!(summary.total_products, 0);

    let content = std::fs::read_to_string(coordinator.layout().products_path()).unwrap();
    assert_eq!(content, "[]");
}

#[tokio::test]
async fn test_image_failure_keeps_product() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/collections/all",
        collection_page(&["/products/scarf"]),
    )
    .await;

    mount_html(
        &mock_server,
        "/products/scarf",
        product_page(
            Some("Scarf"),
            Some(&format!("{}/cdn/scarf.jpg", base_url)),
            Some(""),
            Some("$12.50"),
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/cdn/scarf.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &["/collections/all"], temp.path());
    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.expect("Run failed");

    assert_eq!(summary.total_products, 1);
    assert_eq!(summary.images_downloaded, 0);

    let content = std::fs::read_to_string(coordinator.layout().products_path()).unwrap();
    assert!(content.contains("\"local_image_path\": null"));
    assert!(content.contains("\"description\": \"\""));
}

#[tokio::test]
async fn test_product_fetch_failure_drops_product() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/collections/all",
        collection_page(&["/products/gone", "/products/mug"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/products/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    mount_html(
        &mock_server,
        "/products/mug",
        product_page(
            Some("Mug"),
            Some(&format!("{}/cdn/mug.png", base_url)),
            Some("Ceramic"),
            Some("$5"),
        ),
    )
    .await;

    mount_image(&mock_server, "/cdn/mug.png", b"mug").await;

    let config = create_test_config(&base_url, &["/collections/all"], temp.path());
    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.expect("Run failed");

    assert_eq!(summary.total_products, 1);
    assert_eq!(summary.products_dropped, 1);

    let products = read_products(&coordinator.layout().products_path());
    assert_eq!(products[0].name(), "Mug");
}

#[tokio::test]
async fn test_product_listed_in_two_collections_is_scraped_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/collections/new",
        collection_page(&["/products/mug"]),
    )
    .await;

    mount_html(
        &mock_server,
        "/collections/sale",
        collection_page(&["/products/mug"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/products/mug"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(
            Some("Mug"),
            Some(&format!("{}/cdn/mug.png", base_url)),
            Some("Ceramic"),
            Some("$5"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_image(&mock_server, "/cdn/mug.png", b"mug").await;

    let config = create_test_config(
        &base_url,
        &["/collections/new", "/collections/sale"],
        temp.path(),
    );
    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.expect("Run failed");

    assert_eq!(summary.product_urls_found, 2);
    assert_eq!(summary.total_products, 1);
}

#[tokio::test]
async fn test_rerun_produces_identical_products() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/collections/all",
        collection_page(&["/products/a", "/products/b", "/products/c"]),
    )
    .await;

    let catalog = [
        ("a", "Crème Mug", "$19.99"),
        ("b", "Tea Pot", "$5"),
        ("c", "Spoon", ""),
    ];
    for (slug, name, price) in catalog {
        let price = if price.is_empty() { None } else { Some(price) };
        mount_html(
            &mock_server,
            &format!("/products/{}", slug),
            product_page(
                Some(name),
                Some(&format!("{}/cdn/{}.png", base_url, slug)),
                Some("Kitchen"),
                price,
            ),
        )
        .await;
        mount_image(&mock_server, &format!("/cdn/{}.png", slug), slug.as_bytes()).await;
    }

    let config = create_test_config(&base_url, &["/collections/all"], temp.path());
    let coordinator = Coordinator::new(config).unwrap();

    let sorted = |mut products: Vec<ProductRecord>| {
        products.sort_by(|a, b| a.url().cmp(b.url()));
        products
    };

    let first_summary = coordinator.run().await.expect("First run failed");
    let first = sorted(read_products(&coordinator.layout().products_path()));

    let second_summary = coordinator.run().await.expect("Second run failed");
    let second = sorted(read_products(&coordinator.layout().products_path()));

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
    assert_eq!(first_summary.price_range, second_summary.price_range);
    assert_eq!(
        first_summary.price_range,
        Some(PriceRange {
            min: 5.0,
            max: 19.99
        })
    );

    let content = std::fs::read_to_string(coordinator.layout().products_path()).unwrap();
    assert!(content.contains("Crème Mug"));
    assert!(coordinator.layout().image_path("Cr_me_Mug.png").is_file());
}

#[tokio::test]
async fn test_blank_image_drops_product_and_fragments_collapse() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/collections/all",
        collection_page(&["/products/hat", "/products/hat#reviews", "/products/blank"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/products/hat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(
            Some("Hat"),
            Some(&format!("{}/cdn/hat.png", base_url)),
            Some("Warm"),
            Some("$8"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_html(
        &mock_server,
        "/products/blank",
        product_page(Some("Blank"), Some(""), Some("No image"), Some("$3")),
    )
    .await;

    mount_image(&mock_server, "/cdn/hat.png", b"hat").await;

    let config = create_test_config(&base_url, &["/collections/all"], temp.path());
    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.expect("Run failed");

    assert_eq!(summary.product_urls_found, 2);
    assert_eq!(summary.total_products, 1);
    assert_eq!(summary.products_dropped, 1);
    assert_eq!(summary.images_downloaded, 1);

    let products = read_products(&coordinator.layout().products_path());
    assert_eq!(products[0].name(), "Hat");
    assert!(!coordinator.layout().image_path("Blank.jpg").exists());
}
