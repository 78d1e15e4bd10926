//! six-cities - Browse rental offers from the terminal
//!
//! Thin command-line front end over `libsixcities`: every command drives the
//! same store and services a graphical client would.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use libsixcities::logging::{LogFormat, LoggingConfig};
use libsixcities::store::views::{
    favorites_by_city, map_points, nearby_preview, sorted_reviews, visible_offers,
};
use libsixcities::store::Action;
use libsixcities::types::{AuthInfo, CommentInfo, DetailedOffer, FavoriteStatus, Review};
use libsixcities::{CityName, Config, Offer, SixCitiesError, SixCitiesService, SortOption};

#[derive(Parser, Debug)]
#[command(name = "six-cities")]
#[command(version)]
#[command(about = "Browse rental offers in six European cities")]
#[command(long_about = "\
six-cities - Browse rental offers in six European cities

COMMANDS:
    offers      List offers in a city
    offer       Show one offer with its reviews and neighbours
    favorites   List favorite offers grouped by city
    favorite    Add or remove an offer from favorites
    review      Post a review
    login       Sign in and store the session token
    logout      End the session
    status      Show whether the stored session is valid

USAGE EXAMPLES:
    # Cheapest places in Amsterdam
    six-cities offers --city Amsterdam --sort price-low

    # Offer details as JSON
    six-cities offer 6af6f711-c28d-4121-82cd-e0b462a27f00 --format json

    # Sign in (password from the environment)
    SIX_CITIES_PASSWORD=secret1 six-cities login --email Oliver.conner@gmail.com

CONFIGURATION:
    Configuration file: ~/.config/six-cities/config.toml

    Override with environment variables:
        SIX_CITIES_CONFIG     - Path to config file
        SIX_CITIES_API_URL    - Backend base URL
        SIX_CITIES_PASSWORD   - Password for `login`

EXIT CODES:
    0 - Success
    1 - Request or configuration error
    2 - Not authorized
    3 - Invalid input (short review, weak password, etc.)
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format: text, json or pretty
    #[arg(long, global = true, default_value = "text", value_name = "FORMAT")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List offers in a city
    Offers {
        /// City name
        #[arg(short, long, default_value = "Paris")]
        city: CityName,

        /// Sort order: popular, price-low, price-high or top-rated
        #[arg(short, long, default_value = "popular")]
        sort: SortOption,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one offer with its reviews and neighbours
    Offer {
        /// Offer ID
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List favorite offers grouped by city
    Favorites {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an offer to favorites
    Favorite {
        /// Offer ID
        id: String,

        /// Remove instead of add
        #[arg(long)]
        remove: bool,
    },

    /// Post a review for an offer
    Review {
        /// Offer ID
        id: String,

        /// Rating from 1 to 5
        #[arg(short, long)]
        rating: u8,

        /// Review text, 50 to 299 characters
        #[arg(short, long)]
        comment: String,
    },

    /// Sign in and store the session token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password; prompted for when absent
        #[arg(long, env = "SIX_CITIES_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the session and forget the stored token
    Logout,

    /// Check whether the stored session is valid
    Status {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::new(cli.log_format, "warn".to_string(), cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        let code = e
            .downcast_ref::<SixCitiesError>()
            .map(SixCitiesError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default()?;
    tracing::debug!("Backend: {}", config.api.base_url);
    let service = SixCitiesService::new(&config)?;

    match cli.command {
        Commands::Offers { city, sort, format } => {
            service.offers().get_offers().await?;
            service.store().dispatch(Action::ChangeCity(city));
            let state = service.store().dispatch(Action::SetSortOption(sort));
            let offers = visible_offers(&state);

            match format {
                OutputFormat::Json => print_json(&offers)?,
                OutputFormat::Text => {
                    println!(
                        "{} places to stay in {} ({})",
                        offers.len(),
                        city,
                        sort.label()
                    );
                    for offer in &offers {
                        println!("  {}", format_offer_line(offer));
                    }
                }
            }
        }

        Commands::Offer { id, format } => {
            let bundle = service.offers().get_offer_info(&id).await?;
            let Some(info) = bundle.offer_info.as_ref() else {
                return Err(SixCitiesError::NotFound(format!("Offer {} has no details", id)).into());
            };
            let points = map_points(Some(info), &bundle.nearest_offers);
            let reviews = sorted_reviews(&bundle.reviews);
            let nearby = nearby_preview(&bundle.nearest_offers);

            match format {
                OutputFormat::Json => print_json(&json!({
                    "offer": info,
                    "map_points": points,
                    "reviews": reviews,
                    "review_count": bundle.reviews.len(),
                    "nearby": nearby,
                }))?,
                OutputFormat::Text => {
                    print_offer_detail(info);
                    println!();
                    println!("Reviews ({}):", bundle.reviews.len());
                    for review in &reviews {
                        println!("  {}", format_review(review));
                    }
                    println!();
                    println!("Other places in the neighbourhood:");
                    for offer in nearby {
                        println!("  {}", format_offer_line(offer));
                    }
                    println!();
                    println!("Map points:");
                    for point in &points {
                        println!(
                            "  {} ({:.6}, {:.6})",
                            point.id, point.location.latitude, point.location.longitude
                        );
                    }
                }
            }
        }

        Commands::Favorites { format } => {
            let offers = service.offers().get_offers().await?;
            let groups = favorites_by_city(&offers);

            match format {
                OutputFormat::Json => {
                    let value: Vec<_> = groups
                        .iter()
                        .map(|(city, offers)| json!({ "city": city, "offers": offers }))
                        .collect();
                    print_json(&value)?;
                }
                OutputFormat::Text => {
                    if groups.is_empty() {
                        println!("Nothing yet saved.");
                    }
                    for (city, offers) in &groups {
                        println!("{}", city);
                        for offer in offers {
                            println!("  {}", format_offer_line(offer));
                        }
                    }
                }
            }
        }

        Commands::Favorite { id, remove } => {
            let status = FavoriteStatus::from(!remove);
            let offer = service.offers().add_favourite(&id, status).await?;
            if offer.is_favorite {
                println!("Added {} to favorites", offer.id);
            } else {
                println!("Removed {} from favorites", offer.id);
            }
        }

        Commands::Review {
            id,
            rating,
            comment,
        } => {
            let review = service
                .reviews()
                .send_review(&id, CommentInfo { comment, rating })
                .await?;
            println!("Review {} posted", review.id);
        }

        Commands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Password: ")
                    .context("Failed to read password")?,
            };
            let user = service
                .auth()
                .login(&AuthInfo::new(email, password))
                .await?;
            let name = user.email.or(user.name).unwrap_or_default();
            println!("Logged in {}", name);
            follow_redirect(&service);
        }

        Commands::Logout => {
            service.auth().logout().await?;
            println!("Logged out");
            follow_redirect(&service);
        }

        Commands::Status { format } => {
            let status = service.auth().check_auth().await;
            match format {
                OutputFormat::Json => print_json(&json!({ "auth_status": status }))?,
                OutputFormat::Text => println!("{}", status),
            }
        }
    }

    Ok(())
}

/// A terminal has no pages to switch to; the request is logged and dropped
fn follow_redirect(service: &SixCitiesService) {
    if let Some(route) = service.store().take_redirect() {
        tracing::debug!("Redirect to {}", route.path());
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

fn format_offer_line(offer: &Offer) -> String {
    let mut line = format!(
        "{}  {} - {}, \u{20ac}{} / night, rating {:.1}",
        offer.id, offer.title, offer.place_type, offer.price, offer.rating
    );
    if offer.is_premium {
        line.push_str(" [Premium]");
    }
    if offer.is_favorite {
        line.push_str(" [Favorite]");
    }
    line
}

fn print_offer_detail(info: &DetailedOffer) {
    println!("{}{}", info.title, if info.is_premium { " [Premium]" } else { "" });
    println!(
        "{} in {} - {} bedrooms, max {} adults",
        info.place_type, info.city.name, info.bedrooms, info.max_adults
    );
    println!("\u{20ac}{} / night, rating {:.1}", info.price, info.rating);
    if info.is_favorite {
        println!("In your favorites");
    }
    if !info.goods.is_empty() {
        println!("What's inside: {}", info.goods.join(", "));
    }
    println!(
        "Host: {}{}",
        info.host.name,
        if info.host.is_pro { " (Pro)" } else { "" }
    );
    println!();
    println!("{}", info.description);
}

fn format_review(review: &Review) -> String {
    format!(
        "{} - {} ({}/5): {}",
        review.date.format("%B %Y"),
        review.user.name,
        review.rating,
        review.comment
    )
}
