use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");

    match (std::env::var("TC_USER"), std::env::var("TC_PASSWORD")) {
        (Ok(user), Ok(password)) => mock_server::run_protected(listener, &user, &password).await,
        _ => mock_server::run(listener).await,
    }
}
