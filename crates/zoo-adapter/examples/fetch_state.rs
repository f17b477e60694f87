/*
[INPUT]:  One auth string from the ZOO_AUTH environment variable
[OUTPUT]: Printed hero balances, feed status and owned animals
[POS]:    Examples - single-account read-only session
[UPDATE]: When the auth flow or snapshot shape changes
*/

use zoo_adapter::*;

/// Example: read-only session
///
/// 1. Parse the auth string
/// 2. Bind a user agent from the local cache
/// 3. Authenticate and fetch the game state
#[tokio::main]
async fn main() {
    println!("=== Zoo State Example ===\n");

    let raw = match std::env::var("ZOO_AUTH") {
        Ok(raw) => raw,
        Err(_) => {
            eprintln!("Set ZOO_AUTH to an account auth string");
            return;
        }
    };

    let credential = match AccountCredential::parse(&raw) {
        Ok(credential) => credential,
        Err(e) => {
            eprintln!("Failed to parse credential: {}", e);
            return;
        }
    };
    println!("✓ Account {} ({})", credential.display_name(), credential.account_id());

    let store = match UserAgentStore::load("session_user_agents.json", Vec::new()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to load user agent cache: {}", e);
            return;
        }
    };
    let fingerprint = match store.get_or_create(credential.account_id()).await {
        Ok(binding) => binding,
        Err(e) => {
            eprintln!("Failed to bind user agent: {}", e);
            return;
        }
    };
    println!("✓ User agent bound ({})", fingerprint.platform);

    let mut client = match ZooClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    client.set_credentials(Credentials {
        api_key: credential.api_key().to_string(),
        fingerprint,
    });

    if let Err(e) = client.authenticate(&credential).await {
        eprintln!("Authentication failed: {}", e);
        return;
    }
    println!("✓ Authenticated");

    match client.get_user_data().await {
        Ok(snapshot) => {
            println!("\nCoins:  {}", snapshot.hero.coins);
            println!("Tokens: {}", snapshot.hero.tokens);
            match snapshot.feed.next_feed_at() {
                Some(at) if !snapshot.feed.is_need_feed => println!("Next feed: {}", at),
                _ => println!("Feed: due now"),
            }
            for animal in &snapshot.animals {
                let name = snapshot
                    .animal_catalog(&animal.key)
                    .map(|catalog| catalog.display_name().to_string())
                    .unwrap_or_else(|| animal.key.clone());
                println!("  [{}] {} lvl {}", animal.position, name, animal.level);
            }
        }
        Err(e) => eprintln!("Failed to fetch user data: {}", e),
    }
}
