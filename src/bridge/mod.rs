//! JSON-lines bridge between a page host and a [`FormSession`].
//!
//! One [`FormEvent`] per input line, one [`UiEffect`] per output line. The session lives
//! on the calling task; remote calls and scheduled continuations run as spawned tasks
//! and report back over a channel, so results are applied one at a time in arrival order.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::errors::FormError;
use crate::form::{Continuation, FormEvent, FormSession, Outcome, UiEffect};
use crate::remote::{self, Completion, OptionFetcher, PersonService};

enum Wakeup {
    Completed(Completion),
    Due(Continuation),
}

/// Drive `session` until `input` is exhausted and all spawned work has reported back.
pub async fn run<B, R, W>(
    mut session: FormSession,
    backend: Arc<B>,
    input: R,
    mut output: W,
) -> Result<FormSession, FormError>
where
    B: OptionFetcher + PersonService + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut in_flight = 0usize;

    while input_open || in_flight > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    tracing::debug!("Input closed with {} tasks in flight", in_flight);
                    input_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let outcome = match serde_json::from_str::<FormEvent>(&line) {
                    Ok(event) => session.handle(event),
                    Err(err) => Outcome::rejected(&FormError::from(err)),
                };
                in_flight += spawn_work(&outcome, &backend, &tx);
                write_effects(&mut output, &outcome.effects).await?;
            }
            Some(wakeup) = rx.recv() => {
                in_flight -= 1;
                let effects = match wakeup {
                    Wakeup::Completed(completion) => session.complete(completion),
                    Wakeup::Due(continuation) => session.resume(continuation),
                };
                write_effects(&mut output, &effects).await?;
            }
        }
    }

    output.flush().await?;
    Ok(session)
}

fn spawn_work<B>(outcome: &Outcome, backend: &Arc<B>, tx: &mpsc::UnboundedSender<Wakeup>) -> usize
where
    B: OptionFetcher + PersonService + 'static,
{
    for request in outcome.requests.iter().cloned() {
        let backend = Arc::clone(backend);
        let tx = tx.clone();
        tokio::spawn(async move {
            let completion = remote::execute(backend.as_ref(), request).await;
            let _ = tx.send(Wakeup::Completed(completion));
        });
    }

    for scheduled in outcome.scheduled.iter().cloned() {
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(scheduled.delay).await;
            let _ = tx.send(Wakeup::Due(scheduled.continuation));
        });
    }

    outcome.requests.len() + outcome.scheduled.len()
}

async fn write_effects<W>(output: &mut W, effects: &[UiEffect]) -> Result<(), FormError>
where
    W: AsyncWrite + Unpin,
{
    for effect in effects {
        let mut line = serde_json::to_string(effect)?;
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
    }
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::Value;

    use crate::config::FormConfig;
    use crate::models::{DeleteResponse, OptionItem, RowIndex};

    /// Answers brigade lookups after a delay taken from the point id.
    struct SlowBackend;

    impl OptionFetcher for SlowBackend {
        async fn fetch_brigades(&self, point_id: &str) -> Result<Vec<OptionItem>, FormError> {
            let millis: u64 = point_id.trim_start_matches('P').parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Ok(vec![OptionItem::new(point_id, format!("Brigada de {}", point_id))])
        }

        async fn fetch_roles(&self, _personnel_type: &str) -> Result<Vec<OptionItem>, FormError> {
            Err(FormError::Transport("connection refused".to_string()))
        }
    }

    impl PersonService for SlowBackend {
        async fn delete_person(&self, _entity_id: &str) -> Result<DeleteResponse, FormError> {
            Ok(DeleteResponse {
                msg: "Persona eliminada correctamente".to_string(),
                tipo_msg: None,
            })
        }
    }

    fn test_config() -> FormConfig {
        FormConfig {
            person_type_context: None,
            list_url: "/persona/listar-persona".to_string(),
            delete_url_template: "/persona/eliminar/{id}".to_string(),
            id_placeholder: "{id}".to_string(),
            brigades_url: "/brigadas".to_string(),
            roles_url: "/roles".to_string(),
            coordination_team_id: "9".to_string(),
            home_url: "/".to_string(),
            create_person_url: "/persona/crear-persona".to_string(),
            locale_url: "/static/es.json".to_string(),
            request_timeout: Duration::from_secs(1),
            normalize_delay: Duration::from_millis(5),
            log_level: "warn".to_string(),
        }
    }

    async fn run_lines(input: &str) -> (FormSession, Vec<Value>) {
        let session = FormSession::new(Arc::new(test_config()));
        let mut output = Vec::new();
        let session = run(session, Arc::new(SlowBackend), input.as_bytes(), &mut output)
            .await
            .unwrap();
        let effects = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (session, effects)
    }

    #[tokio::test]
    async fn test_slow_stale_response_does_not_win() {
        let input = concat!(
            r#"{"event":"row_changed","row":0,"field":"point","value":"P80"}"#,
            "\n",
            r#"{"event":"row_changed","row":0,"field":"point","value":"P1"}"#,
            "\n",
        );
        let (session, effects) = run_lines(input).await;

        let row = session.row(RowIndex(0)).unwrap();
        assert_eq!(row.brigades.options, vec![OptionItem::new("P1", "Brigada de P1")]);

        let option_effects: Vec<&Value> = effects
            .iter()
            .filter(|e| e["effect"] == "set_options")
            .collect();
        assert_eq!(option_effects.len(), 1);
        assert_eq!(option_effects[0]["options"][0]["id"], "P1");
    }

    #[tokio::test]
    async fn test_role_failure_is_reported_inline() {
        let input = r#"{"event":"row_changed","row":1,"field":"personnel_type","value":"9"}"#;
        let (session, effects) = run_lines(input).await;

        let kinds: Vec<&str> = effects.iter().filter_map(|e| e["effect"].as_str()).collect();
        assert_eq!(kinds, vec!["set_disabled", "set_disabled", "row_fetch_failed"]);
        assert!(session.row(RowIndex(1)).unwrap().roles.last_error.is_some());
    }

    #[tokio::test]
    async fn test_malformed_line_is_rejected_and_loop_continues() {
        let input = "not json\n{\"event\":\"clear\"}\n";
        let (_, effects) = run_lines(input).await;

        assert_eq!(effects[0]["effect"], "rejected");
        assert_eq!(effects[0]["error"]["code"], "BAD_EVENT");
        assert_eq!(effects[1]["effect"], "navigate");
    }

    #[tokio::test]
    async fn test_uppercase_continuation_runs_after_input() {
        let input = r#"{"event":"input","field":"apellido_paterno","value":"núñez"}"#;
        let (session, effects) = run_lines(input).await;

        assert_eq!(session.values().get("apellido_paterno"), "NÚÑEZ");
        assert_eq!(effects.last().unwrap()["value"], "NÚÑEZ");
    }

    #[tokio::test]
    async fn test_delete_confirmed_navigates_home() {
        let input = concat!(
            r#"{"event":"delete_requested","entity_id":"8"}"#,
            "\n",
            r#"{"event":"confirm_resolved","confirmed":true}"#,
            "\n",
        );
        let (_, effects) = run_lines(input).await;

        let kinds: Vec<&str> = effects.iter().filter_map(|e| e["effect"].as_str()).collect();
        assert_eq!(kinds, vec!["confirm", "notify", "navigate"]);
        assert_eq!(effects[1]["severity"], "success");
        assert_eq!(effects[0]["prompt"]["title"], "Importante");
    }
}
