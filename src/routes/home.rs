use axum::{response::Html, routing::get, Router};
use tracing::info;

use crate::models::ChainId;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

async fn home() -> Html<String> {
    info!("GET / - Landing page");
    Html(render_landing_page())
}

fn render_landing_page() -> String {
    let chain_links: String = ChainId::ALL
        .iter()
        .map(|c| format!("<li><a href='/api/tvl/{0}'>{0}</a></li>", c))
        .collect();

    format!(
        r#"<html>
    <head>
        <title>TVL API</title>
        <style>
            body {{ font-family: Arial, sans-serif; margin: 20px; }}
            h1 {{ color: #2c3e50; }}
            .endpoint {{ background: #f8f9fa; padding: 10px; margin: 10px 0; border-radius: 5px; }}
            code {{ background: #e9ecef; padding: 2px 5px; border-radius: 3px; }}
        </style>
    </head>
    <body>
        <h1>TVL API</h1>
        <p>Total Value Locked per blockchain, sourced from DeFi Llama.</p>

        <div class="endpoint">
            <h3>Single chain:</h3>
            <code>GET /api/tvl/{{chain_id}}</code>
            <p>Example: <a href="/api/tvl/Ethereum">/api/tvl/Ethereum</a></p>
        </div>

        <div class="endpoint">
            <h3>All chains:</h3>
            <code>GET /api/tvl/all</code>
            <p>Example: <a href="/api/tvl/all">/api/tvl/all</a></p>
        </div>

        <div class="endpoint">
            <h3>CSV download:</h3>
            <code>GET /api/tvl/csv</code>
            <p>TVL history of every chain as CSV: <a href="/api/tvl/csv">/api/tvl/csv</a></p>
        </div>

        <h3>Supported chains:</h3>
        <ul>
            {chain_links}
        </ul>
    </body>
</html>
"#
    )
}
