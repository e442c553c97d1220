use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::unbounded_channel;

use emotion_sense::{
    Command, HttpRecommender, Session, Webcam,
    args::Args,
    command::USAGE,
    logger, notification,
    server::run_camera_server,
    view,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let webcam = Arc::new(Webcam::default());
    let (addr, server_handle) = run_camera_server(webcam.clone(), &args.camera_addr()).await?;
    let recommender = Arc::new(HttpRecommender::new(
        args.server_url.clone(),
        args.request_timeout(),
    )?);

    let (outcome_tx, mut outcomes) = unbounded_channel();
    let mut session = Session::new(webcam, recommender, args.session_config(), outcome_tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("open http://{addr}/ in a browser to start the camera");
    println!("{USAGE}");
    print!("{}", view::render(&session, &args.store_url));

    loop {
        let deadline = session.notification_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Command>() {
                    Ok(Command::Help) => println!("{USAGE}"),
                    Ok(cmd) => {
                        if !session.apply(cmd) {
                            break;
                        }
                    }
                    Err(e) => {
                        println!("{e}");
                        println!("{USAGE}");
                        continue;
                    }
                }
            }
            Some(outcome) = outcomes.recv() => session.complete(outcome),
            _ = notification::until(deadline) => session.expire_notifications(),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
        print!("{}", view::render(&session, &args.store_url));
    }

    server_handle.abort();
    let _ = server_handle.await;
    tracing::info!("Camera server stopped");
    Ok(())
}
