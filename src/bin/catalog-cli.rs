use clap::{Parser, Subcommand};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Command-line client for the product catalog API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(short, long, env = "API_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered and paginated
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search products by name
    Search {
        #[arg(long)]
        name: Option<String>,
    },
    /// Count products per category
    Stats,
    /// Show one product
    Get { id: String },
    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        in_stock: bool,
    },
    /// Change fields of an existing product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        in_stock: Option<bool>,
    },
    /// Delete a product
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/api/products", cli.url.trim_end_matches('/'));
    let request = |method: Method, url: String| -> RequestBuilder {
        client.request(method, url).header("X-API-Key", &cli.key)
    };

    let res = match cli.command {
        Commands::List {
            category,
            page,
            limit,
        } => {
            let mut query = Vec::new();
            if let Some(category) = category {
                query.push(("category", category));
            }
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            request(Method::GET, base).query(&query).send().await?
        }
        Commands::Search { name } => {
            let query: Vec<_> = name.into_iter().map(|n| ("name", n)).collect();
            request(Method::GET, format!("{base}/search"))
                .query(&query)
                .send()
                .await?
        }
        Commands::Stats => request(Method::GET, format!("{base}/stats")).send().await?,
        Commands::Get { id } => request(Method::GET, format!("{base}/{id}")).send().await?,
        Commands::Create {
            name,
            description,
            price,
            category,
            in_stock,
        } => {
            let body = json!({
                "name": name,
                "description": description,
                "price": price,
                "category": category,
                "inStock": in_stock,
            });
            request(Method::POST, base).json(&body).send().await?
        }
        Commands::Update {
            id,
            name,
            description,
            price,
            category,
            in_stock,
        } => {
            let mut body = Map::new();
            if let Some(name) = name {
                body.insert("name".into(), json!(name));
            }
            if let Some(description) = description {
                body.insert("description".into(), json!(description));
            }
            if let Some(price) = price {
                body.insert("price".into(), json!(price));
            }
            if let Some(category) = category {
                body.insert("category".into(), json!(category));
            }
            if let Some(in_stock) = in_stock {
                body.insert("inStock".into(), json!(in_stock));
            }
            request(Method::PUT, format!("{base}/{id}"))
                .json(&Value::Object(body))
                .send()
                .await?
        }
        Commands::Delete { id } => request(Method::DELETE, format!("{base}/{id}")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
