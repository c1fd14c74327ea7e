// src/main.rs

use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use triagem::api::{ClassificationResult, ReviewFilter, TriagemClient};
use triagem::config::CONFIG;
use triagem::orchestrator::{SubmissionOrchestrator, SubmissionState};
use triagem::review::ReviewPanel;
use triagem::session::{AuthState, Session, SessionBootstrap};
use triagem::taxonomy::tier_of;

#[derive(Parser)]
#[command(
    name = "triagem",
    about = "Sistema de Triagem baseado no Protocolo de Manchester",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classifica os sintomas do paciente (não salva no banco)
    Classificar {
        /// Descrição livre dos sintomas do paciente
        sintomas: String,
        /// Envia o resultado para validação por especialistas
        #[arg(long)]
        enviar: bool,
    },
    /// Autentica no painel de validação
    Login {
        #[command(flatten)]
        credenciais: Credenciais,
    },
    /// Lista as triagens enviadas para validação
    Triagens {
        #[arg(long, value_enum, default_value = "todas")]
        filtro: FiltroArg,
        #[command(flatten)]
        credenciais: Credenciais,
    },
    /// Valida uma triagem pendente
    Validar {
        triagem_id: String,
        /// Parecer do especialista sobre a classificação
        #[arg(long, default_value = "")]
        feedback: String,
        #[command(flatten)]
        credenciais: Credenciais,
    },
    /// Exclui uma triagem
    Excluir {
        triagem_id: String,
        #[command(flatten)]
        credenciais: Credenciais,
    },
    /// Mostra os contadores de validação
    Estatisticas {
        #[command(flatten)]
        credenciais: Credenciais,
    },
}

#[derive(Args)]
struct Credenciais {
    /// Usuário do painel de validação
    #[arg(long, env = "TRIAGEM_USUARIO")]
    usuario: String,
    /// Senha do painel de validação
    #[arg(long, env = "TRIAGEM_SENHA", hide_env_values = true)]
    senha: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FiltroArg {
    Todas,
    Pendentes,
    Validadas,
}

impl From<FiltroArg> for ReviewFilter {
    fn from(filtro: FiltroArg) -> Self {
        match filtro {
            FiltroArg::Todas => ReviewFilter::Todas,
            FiltroArg::Pendentes => ReviewFilter::Pendentes,
            FiltroArg::Validadas => ReviewFilter::Validadas,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let level = Level::from_str(&CONFIG.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let client = TriagemClient::new(&CONFIG)?;
    info!("Backend: {}", CONFIG.api_base_url);

    match cli.command {
        Command::Classificar { sintomas, enviar } => {
            let orchestrator = SubmissionOrchestrator::new(client);

            let state = orchestrator.classify(&sintomas).await;
            match &state {
                SubmissionState::Classified { result } => render_result(result),
                SubmissionState::Failed { message, .. } => anyhow::bail!("{message}"),
                _ => {}
            }

            if enviar {
                let state = orchestrator.persist().await;
                match &state {
                    SubmissionState::Persisted { record_id, .. } => {
                        println!();
                        println!("✅ Triagem enviada para validação com sucesso!");
                        println!("ID de Rastreamento: {record_id}");
                    }
                    SubmissionState::Failed { message, .. } => anyhow::bail!("{message}"),
                    _ => {}
                }
            }
        }
        Command::Login { credenciais } => {
            let session = authenticate(&client, &credenciais).await?;
            println!("Login realizado com sucesso. Usuário: {}", session.user);
        }
        Command::Triagens { filtro, credenciais } => {
            let session = authenticate(&client, &credenciais).await?;
            let panel = ReviewPanel::new(client.clone(), session);

            let registros = panel.list(filtro.into()).await?;
            if registros.is_empty() {
                println!("Nenhuma triagem encontrada.");
            }
            for registro in &registros {
                let status = if registro.is_validated() {
                    "validada"
                } else {
                    "pendente"
                };
                println!("{}  {}  [{status}]", registro.id, registro.data_hora);
                println!("    {}", resumo(&registro.sintomas));
            }
        }
        Command::Validar {
            triagem_id,
            feedback,
            credenciais,
        } => {
            let session = authenticate(&client, &credenciais).await?;
            let panel = ReviewPanel::new(client.clone(), session);

            let outcome = panel.validate(&triagem_id, &feedback).await?;
            if !outcome.success {
                anyhow::bail!("{}", outcome.message);
            }
            println!("Triagem {triagem_id} validada.");
        }
        Command::Excluir {
            triagem_id,
            credenciais,
        } => {
            let session = authenticate(&client, &credenciais).await?;
            let panel = ReviewPanel::new(client.clone(), session);

            panel.remove(&triagem_id).await?;
            println!("Triagem {triagem_id} excluída.");
        }
        Command::Estatisticas { credenciais } => {
            let session = authenticate(&client, &credenciais).await?;
            let panel = ReviewPanel::new(client.clone(), session);

            let stats = panel.stats().await?;
            println!("Total de triagens: {}", stats.total);
            println!("Pendentes: {}", stats.pendentes);
            println!("Validadas: {}", stats.validadas);
        }
    }

    Ok(())
}

async fn authenticate(
    client: &TriagemClient,
    credenciais: &Credenciais,
) -> anyhow::Result<Session> {
    let bootstrap = SessionBootstrap::new(client.clone());
    match bootstrap.login(&credenciais.usuario, &credenciais.senha).await {
        AuthState::Authenticated { session } => Ok(session),
        state => anyhow::bail!(
            "{}",
            state
                .error_message()
                .unwrap_or(triagem::session::MSG_ERRO_LOGIN)
        ),
    }
}

fn render_result(result: &ClassificationResult) {
    let tier = tier_of(&result.classificacao);
    match tier.icon {
        Some(icon) => println!("{icon} Classificação: {}", tier.label),
        None => println!("Classificação: {}", tier.label),
    }
    println!();
    println!("Análise Clínica");
    println!("{}", result.justificativa);
    println!();
    println!("Condutas Recomendadas");
    println!("{}", result.condutas);
}

fn resumo(sintomas: &str) -> String {
    let mut resumo: String = sintomas.chars().take(80).collect();
    if sintomas.chars().count() > 80 {
        resumo.push('…');
    }
    resumo
}
