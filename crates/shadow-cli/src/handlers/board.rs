use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;
use serde::Serialize;
use shadow_domain::{IntegrityIssue, Quest, ShadowOperations};

#[derive(Serialize)]
struct ColumnView<'a> {
    id: &'a str,
    title: &'a str,
    count: usize,
    quests: Vec<&'a Quest>,
}

#[derive(Serialize)]
struct BoardView<'a> {
    id: &'a str,
    title: String,
    columns: Vec<ColumnView<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<IntegrityIssue>,
}

pub async fn handle(ctx: &mut CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::New => {
            let id = ctx.board.board_id().clone();
            let title = ctx.titles.load(&id).await;
            output::output_success(serde_json::json!({
                "id": id,
                "title": title,
            }));
        }
        BoardAction::Show => {
            let title = ctx.titles.load(ctx.board.board_id()).await;
            let board = ctx.board.board();
            let view = BoardView {
                id: ctx.board.board_id().as_str(),
                title,
                columns: board
                    .ordered_columns()
                    .map(|column| ColumnView {
                        id: column.id.as_str(),
                        title: &column.title,
                        count: column.len(),
                        quests: board.quests_in(&column.id),
                    })
                    .collect(),
                issues: board.check_integrity(),
            };
            output::output_success(&view);
        }
        BoardAction::Title { set } => {
            let id = ctx.board.board_id().clone();
            let changed = match set {
                Some(title) => ctx.titles.save(&id, &title).await,
                None => false,
            };
            let title = ctx.titles.load(&id).await;
            output::output_success(serde_json::json!({
                "id": id,
                "title": title,
                "changed": changed,
            }));
        }
    }
    Ok(())
}
