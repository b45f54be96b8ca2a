use clap::Subcommand;
use studyplan_core::export::GoogleTokens;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store client credentials and run the browser sign-in
    Login {
        /// OAuth client ID
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth client secret
        #[arg(long)]
        client_secret: Option<String>,
    },
    /// Remove stored tokens
    Logout,
    /// Check authentication status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login {
            client_id,
            client_secret,
        } => {
            match (client_id, client_secret) {
                (Some(cid), Some(csec)) => GoogleTokens::set_credentials(&cid, &csec)?,
                (None, None) => {}
                _ => return Err("--client-id and --client-secret must be given together".into()),
            }
            let google = GoogleTokens::new();
            super::runtime()?.block_on(google.authenticate())?;
            println!("Google authenticated");
        }
        AuthAction::Logout => {
            GoogleTokens::new().disconnect()?;
            println!("Google disconnected");
        }
        AuthAction::Status => {
            let google = GoogleTokens::new();
            println!(
                "{}",
                if google.is_authenticated() {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}
