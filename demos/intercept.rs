//! Run the attach decision against a few URLs from the command line.
//!
//! ```bash
//! API_TOKEN=eyJhbG... cargo run --example intercept -- http://api.example.com/v1/me /local/api
//! ```

use jwt_interceptor::{Decision, JwtConfig, JwtInterceptor, RequestMeta};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let interceptor = JwtInterceptor::new(
        JwtConfig::new(|_req: Option<&RequestMeta>| std::env::var("API_TOKEN").ok())
            .allowed_domains(["api.example.com", "api.example.com:8080"])
            .disallowed_routes(["api.example.com/public"]),
    );

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        eprintln!("usage: intercept <url> [<url> ...]   (set API_TOKEN)");
        std::process::exit(1);
    }

    for url in urls {
        let meta = RequestMeta::new(&url, http::Method::GET);
        match interceptor.authorize(&meta).await {
            Ok(Decision::Attach { name, value }) => {
                println!("{url}\n  attach {name}: {value:?}");
            }
            Ok(Decision::PassThrough) => println!("{url}\n  pass through"),
            Err(e) => println!("{url}\n  error: {e}"),
        }
    }
}
