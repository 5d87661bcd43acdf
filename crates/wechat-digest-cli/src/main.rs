use clap::{Parser, Subcommand};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::error::Error;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "wechat-digest")]
#[command(about = "A CLI for the WeChat digest service")]
struct Cli {
    /// Base URL for the digest service
    #[arg(long, env = "WECHAT_DIGEST_URL", default_value = "http://localhost:3000")]
    service_url: String,

    /// Bearer token for keyword and subscription changes
    #[arg(long, env = "ADMIN_PASSWORD", global = true, hide_env_values = true)]
    admin_password: Option<String>,

    /// Bearer token for triggering an ingestion run
    #[arg(long, env = "CRON_SECRET", global = true, hide_env_values = true)]
    cron_secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one ingestion pass now and print its totals
    Fetch,
    /// List stored articles
    Articles {
        #[arg(short, long)]
        category: Option<String>,
        /// Substring of the title or summary
        #[arg(short, long)]
        keyword: Option<String>,
        /// Substring of the account name
        #[arg(short, long)]
        account: Option<String>,
        /// "hot" or "latest"
        #[arg(short, long)]
        sort: Option<String>,
        #[arg(short, long)]
        page: Option<u32>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Manage search keywords
    #[command(subcommand)]
    Keywords(KeywordCommands),
    /// Manage followed accounts
    #[command(subcommand)]
    Subscriptions(SubscriptionCommands),
}

#[derive(Subcommand, Debug)]
enum KeywordCommands {
    List,
    Add {
        keyword: String,
        category: String,
        /// Create the keyword switched off
        #[arg(long)]
        inactive: bool,
    },
    Update {
        id: i32,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Remove {
        id: i32,
    },
}

#[derive(Subcommand, Debug)]
enum SubscriptionCommands {
    List,
    Add {
        account_name: String,
        #[arg(long)]
        account_id: Option<String>,
        #[arg(long)]
        inactive: bool,
    },
    Update {
        id: i32,
        #[arg(long)]
        account_name: Option<String>,
        #[arg(long)]
        account_id: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Remove {
        id: i32,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeywordPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FetchResponse {
    total_fetched: u64,
    total_saved: u64,
    keywords: u64,
    subscriptions: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: String,
    url: String,
    account_name: String,
    category: String,
    read_count: i64,
    published_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    page: u32,
    total: u64,
    total_pages: u64,
}

#[derive(Deserialize)]
struct ArticleList {
    articles: Vec<Article>,
    pagination: Pagination,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Keyword {
    id: i32,
    keyword: String,
    category: String,
    is_active: bool,
}

#[derive(Deserialize)]
struct KeywordList {
    keywords: Vec<Keyword>,
}

#[derive(Deserialize)]
struct KeywordEnvelope {
    keyword: Keyword,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Subscription {
    id: i32,
    account_name: String,
    account_id: Option<String>,
    is_active: bool,
}

#[derive(Deserialize)]
struct SubscriptionList {
    subscriptions: Vec<Subscription>,
}

#[derive(Deserialize)]
struct SubscriptionEnvelope {
    subscription: Subscription,
}

struct ServiceClient {
    client: Client,
    base: Url,
    admin_password: Option<String>,
    cron_secret: Option<String>,
}

impl ServiceClient {
    fn new(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let mut base = Url::parse(&cli.service_url)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        Ok(Self {
            client: Client::new(),
            base,
            admin_password: cli.admin_password.clone(),
            cron_secret: cli.cron_secret.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Box<dyn Error>> {
        Ok(self.base.join(path)?)
    }

    fn admin(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.admin_password {
            Some(password) => request.bearer_auth(password),
            None => request,
        }
    }
}

async fn check(response: Response) -> Result<Response, Box<dyn Error>> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value["error"].as_str().map(str::to_string))
        .unwrap_or(body);
    Err(format!("request failed with {status}: {message}").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let service = ServiceClient::new(&cli)?;

    match cli.command {
        Commands::Fetch => fetch(&service).await?,
        Commands::Articles {
            category,
            keyword,
            account,
            sort,
            page,
            limit,
        } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            let text_params = [
                ("category", category),
                ("keyword", keyword),
                ("account", account),
                ("sort", sort),
            ];
            for (key, value) in text_params {
                if let Some(value) = value {
                    query.push((key, value));
                }
            }
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            list_articles(&service, &query).await?;
        }
        Commands::Keywords(command) => keywords(&service, command).await?,
        Commands::Subscriptions(command) => subscriptions(&service, command).await?,
    }

    Ok(())
}

async fn fetch(service: &ServiceClient) -> Result<(), Box<dyn Error>> {
    let mut request = service.client.get(service.endpoint("api/v1/cron/fetch")?);
    if let Some(secret) = &service.cron_secret {
        request = request.bearer_auth(secret);
    }

    let summary: FetchResponse = check(request.send().await?).await?.json().await?;
    println!(
        "Fetched {} articles, saved {} ({} keywords, {} subscriptions)",
        summary.total_fetched, summary.total_saved, summary.keywords, summary.subscriptions
    );
    Ok(())
}

async fn list_articles(
    service: &ServiceClient,
    query: &[(&str, String)],
) -> Result<(), Box<dyn Error>> {
    let request = service
        .client
        .get(service.endpoint("api/v1/articles")?)
        .query(query);
    let list: ArticleList = check(request.send().await?).await?.json().await?;

    for article in &list.articles {
        println!(
            "[{}] {} | {} | {} reads | {}",
            article.category, article.title, article.account_name, article.read_count, article.published_at
        );
        println!("    {}", article.url);
    }
    println!(
        "Page {} of {} ({} articles)",
        list.pagination.page, list.pagination.total_pages, list.pagination.total
    );
    Ok(())
}

fn print_keyword(keyword: &Keyword) {
    let state = if keyword.is_active { "active" } else { "inactive" };
    println!(
        "{:>4}  {}  [{}]  {}",
        keyword.id, keyword.keyword, keyword.category, state
    );
}

fn print_subscription(subscription: &Subscription) {
    let state = if subscription.is_active { "active" } else { "inactive" };
    println!(
        "{:>4}  {}  {}  {}",
        subscription.id,
        subscription.account_name,
        subscription.account_id.as_deref().unwrap_or("-"),
        state
    );
}

async fn keywords(service: &ServiceClient, command: KeywordCommands) -> Result<(), Box<dyn Error>> {
    let collection = service.endpoint("api/v1/keywords")?;

    match command {
        KeywordCommands::List => {
            let list: KeywordList = check(service.client.get(collection).send().await?)
                .await?
                .json()
                .await?;
            list.keywords.iter().for_each(print_keyword);
        }
        KeywordCommands::Add {
            keyword,
            category,
            inactive,
        } => {
            let payload = KeywordPayload {
                keyword: Some(keyword),
                category: Some(category),
                is_active: Some(!inactive),
            };
            let request = service.admin(service.client.post(collection).json(&payload));
            let created: KeywordEnvelope = check(request.send().await?).await?.json().await?;
            print_keyword(&created.keyword);
        }
        KeywordCommands::Update {
            id,
            keyword,
            category,
            active,
        } => {
            let payload = KeywordPayload {
                keyword,
                category,
                is_active: active,
            };
            let endpoint = service.endpoint(&format!("api/v1/keywords/{id}"))?;
            let request = service.admin(service.client.put(endpoint).json(&payload));
            let updated: KeywordEnvelope = check(request.send().await?).await?.json().await?;
            print_keyword(&updated.keyword);
        }
        KeywordCommands::Remove { id } => {
            let endpoint = service.endpoint(&format!("api/v1/keywords/{id}"))?;
            check(service.admin(service.client.delete(endpoint)).send().await?).await?;
            println!("Removed keyword {id}");
        }
    }

    Ok(())
}

async fn subscriptions(
    service: &ServiceClient,
    command: SubscriptionCommands,
) -> Result<(), Box<dyn Error>> {
    let collection = service.endpoint("api/v1/subscriptions")?;

    match command {
        SubscriptionCommands::List => {
            let list: SubscriptionList = check(service.client.get(collection).send().await?)
                .await?
                .json()
                .await?;
            list.subscriptions.iter().for_each(print_subscription);
        }
        SubscriptionCommands::Add {
            account_name,
            account_id,
            inactive,
        } => {
            let payload = SubscriptionPayload {
                account_name: Some(account_name),
                account_id,
                is_active: Some(!inactive),
            };
            let request = service.admin(service.client.post(collection).json(&payload));
            let created: SubscriptionEnvelope =
                check(request.send().await?).await?.json().await?;
            print_subscription(&created.subscription);
        }
        SubscriptionCommands::Update {
            id,
            account_name,
            account_id,
            active,
        } => {
            let payload = SubscriptionPayload {
                account_name,
                account_id,
                is_active: active,
            };
            let endpoint = service.endpoint(&format!("api/v1/subscriptions/{id}"))?;
            let request = service.admin(service.client.put(endpoint).json(&payload));
            let updated: SubscriptionEnvelope =
                check(request.send().await?).await?.json().await?;
            print_subscription(&updated.subscription);
        }
        SubscriptionCommands::Remove { id } => {
            let endpoint = service.endpoint(&format!("api/v1/subscriptions/{id}"))?;
            check(service.admin(service.client.delete(endpoint)).send().await?).await?;
            println!("Removed subscription {id}");
        }
    }

    Ok(())
}
