use crate::helpers::spawn_app;

#[tokio::test]
async fn home_serves_the_contact_form() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(&app.address)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let content_type = response.headers()["content-type"].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/html"));
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"action="/api/contact""#));
    assert!(html.contains(r#"name="phone""#));
}
