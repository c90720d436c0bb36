use std::process::ExitCode;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use medeez_auth::{Claims, ClinicId, JwtVerifier, Role, TokenVerifier, encode_claims};
use medeez_config::JwtConfig;

#[derive(Parser)]
#[command(name = "medeez-cli")]
#[command(about = "Medeez CLI - Development tools for the Medeez API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign an access token with the configured JWT_SECRET
    IssueToken(IssueTokenArgs),
    /// Verify a token and print its claims
    InspectToken {
        /// The token to verify
        token: String,
    },
}

#[derive(Args)]
struct IssueTokenArgs {
    /// User ID (subject)
    #[arg(short = 's', long)]
    sub: String,

    /// Email address
    #[arg(short = 'e', long)]
    email: String,

    /// Clinic the user belongs to
    #[arg(short = 'c', long)]
    clinic: ClinicId,

    /// One of staff, doctor, admin, system_admin
    #[arg(short = 'r', long, default_value = "staff")]
    role: Role,

    /// Granted permission, repeatable (e.g. -p patients:read -p notes:read)
    #[arg(short = 'p', long = "permission")]
    permissions: Vec<String>,

    /// Mark the account inactive
    #[arg(long)]
    inactive: bool,

    /// Lifetime in seconds (defaults to JWT_ACCESS_EXPIRY)
    #[arg(long)]
    expires_in: Option<i64>,
}

fn issue_token(jwt_config: &JwtConfig, args: IssueTokenArgs) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();
    let lifetime = args.expires_in.unwrap_or(jwt_config.access_token_expiry);
    let exp = now.saturating_add(lifetime).max(0);

    let claims = Claims {
        sub: args.sub,
        email: args.email,
        clinic_id: args.clinic.into_inner(),
        role: args.role,
        permissions: args.permissions,
        is_active: !args.inactive,
        iss: jwt_config.issuer.clone(),
        aud: jwt_config.audience.clone(),
        exp: exp as usize,
        iat: now as usize,
    };

    encode_claims(&claims, jwt_config).map_err(|e| e.error)
}

fn main() -> ExitCode {
    dotenv().ok();

    let cli = Cli::parse();
    let jwt_config = JwtConfig::from_env();

    match cli.command {
        Commands::IssueToken(args) => match issue_token(&jwt_config, args) {
            Ok(token) => {
                println!("{}", token);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Error issuing token: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::InspectToken { token } => {
            match JwtVerifier::new(&jwt_config).verify(&token) {
                Ok(claims) => match serde_json::to_string_pretty(&claims) {
                    Ok(json) => {
                        println!("{}", json);
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("❌ Error printing claims: {}", e);
                        ExitCode::FAILURE
                    }
                },
                Err(e) => {
                    eprintln!("❌ {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "cli-test-secret".to_string(),
            access_token_expiry: 3600,
            issuer: None,
            audience: None,
            leeway: 0,
        }
    }

    #[test]
    fn test_issue_token_from_args() {
        let cli = Cli::parse_from([
            "medeez-cli",
            "issue-token",
            "--sub",
            "user-1",
            "--email",
            "doc@clinic.test",
            "--clinic",
            "clinic-A",
            "--role",
            "doctor",
            "-p",
            "patients:read",
            "--inactive",
        ]);
        let Commands::IssueToken(args) = cli.command else {
            panic!("expected issue-token");
        };

        let config = jwt_config();
        let token = issue_token(&config, args).unwrap();
        let claims = JwtVerifier::new(&config).verify(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.clinic_id, "clinic-A");
        assert_eq!(claims.role, Role::Doctor);
        assert_eq!(claims.permissions, vec!["patients:read"]);
        assert!(!claims.is_active);
    }
}
