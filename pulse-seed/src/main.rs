//! Seeds the source store with generated tweet records.
//!
//! Dev utility for exercising the pipeline end to end: finds the highest
//! existing id in the store, then posts `SEED_COUNT` fresh tweets with
//! consecutive ids.

use chrono::{SecondsFormat, Utc};
use dotenv::dotenv;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::env;

const DEFAULT_SOURCE_URL: &str = "http://localhost:3000/tweets";
const DEFAULT_SEED_COUNT: u64 = 20;

/// First id handed out when the store is empty or unreadable.
const FIRST_ID: u64 = 1000;

/// City centers tweets are scattered around.
const CITIES: [(f64, f64); 8] = [
    (40.7128, -74.0060),  // New York
    (34.0522, -118.2437), // Los Angeles
    (51.5074, -0.1278),   // London
    (48.8566, 2.3522),    // Paris
    (35.6762, 139.6503),  // Tokyo
    (19.0760, 72.8777),   // Mumbai
    (55.7558, 37.6173),   // Moscow
    (-33.8688, 151.2093), // Sydney
];

const HASHTAGS: [&str; 20] = [
    "tech", "AI", "machinelearning", "python", "java",
    "programming", "data", "cloud", "serverless", "bigdata",
    "blockchain", "cybersecurity", "IoT", "analytics", "docker",
    "kubernetes", "devops", "frontend", "backend", "fullstack",
];

/// Free-form profile locations; some match the processor's city table.
const PROFILE_LOCATIONS: [&str; 6] = [
    "New York, USA",
    "London, UK",
    "Tokyo",
    "Paris 9e",
    "Mumbai",
    "somewhere on the internet",
];

fn random_hashtags() -> Vec<&'static str> {
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(1..=3);
    HASHTAGS.choose_multiple(&mut rng, count).copied().collect()
}

fn random_text(hashtags: &[&str]) -> String {
    let mut rng = rand::thread_rng();
    let tags = hashtags
        .iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ");

    match rng.gen_range(0..5) {
        0 => format!("New trending topic on {} - what do you think?", tags),
        1 => format!("Love how fast the {} ecosystem is moving", tags),
        2 => format!("Great deep dive on {} doing the rounds today", tags),
        3 => format!("The state of {} tooling is honestly terrible", tags),
        _ => format!("Sad to see {} hype drowning out everything else", tags),
    }
}

fn random_user() -> Value {
    let mut rng = rand::thread_rng();
    let mut user = json!({
        "id": rng.gen_range(1000..=9999),
        "screen_name": format!("user_{}", rng.gen_range(1000..=9999)),
        "followers_count": rng.gen_range(1..=10_000),
    });
    if rng.gen_bool(0.5) {
        user["location"] = json!(PROFILE_LOCATIONS[rng.gen_range(0..PROFILE_LOCATIONS.len())]);
    }
    user
}

fn random_location() -> Value {
    let mut rng = rand::thread_rng();
    let (lat, lon) = CITIES[rng.gen_range(0..CITIES.len())];
    json!({
        "lat": lat + rng.gen_range(-0.1..0.1),
        "lon": lon + rng.gen_range(-0.1..0.1),
    })
}

fn generate_tweet(id: u64) -> Value {
    let mut rng = rand::thread_rng();
    let hashtags = random_hashtags();

    let mut tweet = json!({
        "id": id,
        "text": random_text(&hashtags),
        "user": random_user(),
        "created_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "hashtags": hashtags,
        "retweet_count": rng.gen_range(0..=100),
        "favorite_count": rng.gen_range(0..=200),
    });

    // Roughly one tweet in five ships without coordinates.
    if rng.gen_bool(0.8) {
        tweet["location"] = random_location();
    }
    tweet
}

/// Read an id that may be stored as a number or a numeric string.
fn numeric_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

async fn next_available_id(client: &Client, url: &str) -> u64 {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Could not fetch existing tweets ({}), starting at {}", e, FIRST_ID);
            return FIRST_ID;
        }
    };

    if !response.status().is_success() {
        eprintln!(
            "Could not fetch existing tweets (HTTP {}), starting at {}",
            response.status(),
            FIRST_ID
        );
        return FIRST_ID;
    }

    let snapshot: Vec<Value> = match response.json().await {
        Ok(tweets) => tweets,
        Err(e) => {
            eprintln!("Snapshot was not a tweet array ({}), starting at {}", e, FIRST_ID);
            return FIRST_ID;
        }
    };

    let highest = snapshot
        .iter()
        .filter_map(|tweet| tweet.get("id").and_then(numeric_id))
        .max()
        .unwrap_or(0);

    if highest > 0 {
        println!("Found highest id {}, continuing from {}", highest, highest + 1);
        highest + 1
    } else {
        FIRST_ID
    }
}

async fn post_tweet(
    client: &Client,
    url: &str,
    tweet: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.post(url).json(tweet).send().await?;
    if response.status() != StatusCode::CREATED {
        return Err(format!("HTTP {}", response.status()).into());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let url = env::var("SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
    let count: u64 = env::var("SEED_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SEED_COUNT);

    println!("Seeding {} tweets into {}", count, url);

    let client = Client::new();
    let first_id = next_available_id(&client, &url).await;

    let mut added = 0;
    for id in first_id..first_id + count {
        let tweet = generate_tweet(id);
        match post_tweet(&client, &url, &tweet).await {
            Ok(()) => {
                println!("Added tweet {}", id);
                added += 1;
            }
            Err(e) => eprintln!("Failed to add tweet {}: {}", id, e),
        }
    }

    println!("Done: {} of {} tweets added", added, count);
    Ok(())
}
