use std::process::ExitCode;

use clap::{Parser, Subcommand};

use formship_client::{
    app_state::AppState,
    config::Config,
    errors::{ClientError, ClientResult, ErrorResponse},
    models::dto::request::{LoginRequest, ParticipantLoginRequest, VerifyAccessRequest},
    router::{Navigation, RouteData},
};

#[derive(Parser)]
#[command(name = "formship")]
#[command(about = "Formship client - quiz sessions and access checks from the terminal")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Report errors as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the route guards for a path and print where it lands")]
    Navigate {
        #[arg(help = "Client path, e.g. /quiz/42")]
        path: String,
        #[arg(long, conflicts_with = "email", help = "Pass the quiz's password check first")]
        password: Option<String>,
        #[arg(long, help = "Pass the quiz's invitation check first")]
        email: Option<String>,
    },

    #[command(about = "Sign in as an account holder")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Sign in as a participant")]
    ParticipantLogin {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(
        about = "Pass a quiz's password or invitation check",
        long_about = "Pass a quiz's password or invitation check. The quiz binding lasts \
                      for this run only; to enter the quiz afterwards use \
                      `navigate /quiz/<id> --password ...` or `--email ...`."
    )]
    VerifyAccess {
        #[arg(help = "Quiz id")]
        quiz_id: String,
        #[arg(long, conflicts_with = "email", required_unless_present = "email")]
        password: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    #[command(about = "Show the current sessions")]
    Whoami,

    #[command(about = "Sign out")]
    Logout {
        #[arg(long, help = "Sign out the participant instead of the account holder")]
        participant: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                let body = ErrorResponse::from(&e);
                match serde_json::to_string(&body) {
                    Ok(rendered) => println!("{}", rendered),
                    Err(_) => eprintln!("{}", e),
                }
            } else {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let app = AppState::new(Config::from_env())?;
    app.initialize().await;

    match cli.command {
        Commands::Navigate {
            path,
            password,
            email,
        } => {
            if let Some(request) = access_request(password, email) {
                let quiz_id = app
                    .router
                    .routes()
                    .resolve(&path)
                    .and_then(|route| route.param("id").map(str::to_string))
                    .ok_or_else(|| {
                        ClientError::ValidationError(format!("{} does not name a quiz", path))
                    })?;
                app.participant_auth.verify_access(&quiz_id, request).await?;
            }
            print_navigation(app.router.navigate(&path).await);
        }
        Commands::Login { username, password } => {
            let session = app
                .account_auth
                .authenticate(LoginRequest { username, password })
                .await?;
            let user = session.user.as_ref().map(|u| u.username.as_str()).unwrap_or("");
            println!("signed in as {}", user);
        }
        Commands::ParticipantLogin { email, password } => {
            let session = app
                .participant_auth
                .login(ParticipantLoginRequest { email, password })
                .await?;
            let name = session
                .participant
                .as_ref()
                .map(|p| p.display_name())
                .unwrap_or("");
            println!("signed in as participant {}", name);
        }
        Commands::VerifyAccess {
            quiz_id,
            password,
            email,
        } => {
            let request = access_request(password, email).ok_or_else(|| {
                ClientError::ValidationError("either --password or --email is required".to_string())
            })?;
            app.participant_auth.verify_access(&quiz_id, request).await?;
            println!("access granted to quiz {} (this run only)", quiz_id);
        }
        Commands::Whoami => {
            let (account, participant) = app.sessions.snapshots().await;
            match &account.user {
                Some(user) => println!(
                    "account: {} ({:?}, account {})",
                    user.username,
                    user.role,
                    account.account_id().unwrap_or("-")
                ),
                None => println!("account: signed out"),
            }
            match &participant.participant {
                Some(p) => println!(
                    "participant: {} (quiz {})",
                    p.display_name(),
                    participant
                        .current_quiz
                        .as_ref()
                        .map(|q| q.id.as_str())
                        .unwrap_or("-")
                ),
                None => println!("participant: signed out"),
            }
        }
        Commands::Logout { participant } => {
            if participant {
                app.participant_auth.logout().await?;
            } else {
                app.account_auth.logout().await?;
            }
            println!("signed out");
        }
    }

    Ok(())
}

fn access_request(password: Option<String>, email: Option<String>) -> Option<VerifyAccessRequest> {
    match (password, email) {
        (Some(password), _) => Some(VerifyAccessRequest::password(&password)),
        (None, Some(email)) => Some(VerifyAccessRequest::email(&email)),
        (None, None) => None,
    }
}

fn print_navigation(navigation: Navigation) {
    match navigation {
        Navigation::Render { view, params, data } => {
            if params.is_empty() {
                println!("render {}", view);
            } else {
                let params: Vec<String> =
                    params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                println!("render {} ({})", view, params.join(", "));
            }
            if let RouteData::Members(members) = data {
                for member in members {
                    println!("  {} <{}> {:?}", member.user_name, member.user_email, member.role);
                }
            }
        }
        Navigation::Redirect {
            to,
            path,
            reason,
            return_to,
        } => {
            println!(
                "redirect {} {} reason={} return_to={}",
                to,
                path,
                reason,
                return_to.unwrap_or_default()
            );
        }
        Navigation::Superseded => println!("superseded"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_accepts_an_inline_access_check() {
        let cli = Cli::try_parse_from(["formship", "navigate", "/quiz/q3", "--password", "letmein"])
            .unwrap();
        match cli.command {
            Commands::Navigate { path, password, email } => {
                assert_eq!(path, "/quiz/q3");
                let body = serde_json::to_value(access_request(password, email).unwrap()).unwrap();
                assert_eq!(body, serde_json::json!({ "password": "letmein" }));
            }
            _ => panic!("expected navigate"),
        }
    }

    #[test]
    fn navigate_rejects_password_and_email_together() {
        let parsed = Cli::try_parse_from([
            "formship", "navigate", "/quiz/q3", "--password", "x", "--email", "a@b.io",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn plain_navigate_runs_no_access_check() {
        assert!(access_request(None, None).is_none());
    }
}
