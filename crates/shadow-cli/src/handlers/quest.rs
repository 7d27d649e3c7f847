use crate::cli::{QuestAction, QuestCreateArgs, QuestUpdateArgs};
use crate::context::CliContext;
use crate::output;
use shadow_domain::{ColumnId, FieldUpdate, QuestForm, QuestUpdate, ShadowOperations};

pub async fn handle(ctx: &mut CliContext, action: QuestAction) -> anyhow::Result<()> {
    match action {
        QuestAction::Create(args) => {
            let column_id = ColumnId::new(args.column.clone());
            let form = build_form(args);
            match ctx.board.create_quest(Some(column_id.clone()), form)? {
                Some(quest) => {
                    ctx.save().await;
                    output::output_success(&quest);
                }
                None => {
                    return output::output_error(&format!("Column not found: {}", column_id))
                }
            }
        }
        QuestAction::Update(args) => {
            let quest_id = ctx.existing_quest(&args.id)?;
            let quest = ctx.board.update_quest(&quest_id, build_update(args))?;
            ctx.save().await;
            output::output_success(&quest);
        }
        QuestAction::Delete { id, purge_timer } => {
            let quest_id = ctx.existing_quest(&id)?;
            ctx.board.delete_quest(&quest_id)?;
            ctx.save().await;
            let timer_removed = purge_timer && ctx.timers.remove(&quest_id).await;
            output::output_success(serde_json::json!({
                "deleted": quest_id,
                "timer_removed": timer_removed,
            }));
        }
        QuestAction::Move { id, to, index } => {
            let quest_id = ctx.existing_quest(&id)?;
            let outcome = ctx.board.move_quest(&quest_id, ColumnId::new(to), index)?;
            ctx.save().await;
            let (column, index) = ctx.board.board().locate(&quest_id).unzip();
            output::output_success(serde_json::json!({
                "id": quest_id,
                "outcome": outcome,
                "column": column,
                "index": index,
            }));
        }
        QuestAction::ToggleTimer { id } => {
            let quest_id = ctx.existing_quest(&id)?;
            let quest = ctx.board.toggle_pomodoro(&quest_id)?;
            ctx.save().await;
            output::output_success(&quest);
        }
        QuestAction::Get { id } => match ctx.board.get_quest(&id.as_str().into())? {
            Some(quest) => output::output_success(&quest),
            None => return output::output_error(&format!("Quest not found: {}", id)),
        },
        QuestAction::List { column } => {
            let column_id = column.map(ColumnId::new);
            let quests = ctx.board.list_quests(column_id.as_ref())?;
            output::output_list(quests);
        }
    }
    Ok(())
}

fn build_form(args: QuestCreateArgs) -> QuestForm {
    let mut form =
        QuestForm::new(args.title.trim().to_string()).with_description(args.description);
    if let Some(rank) = args.rank {
        form.change_rank(rank);
    }
    if let Some(points) = args.points {
        form.slide_points(points);
    }
    form
}

fn build_update(args: QuestUpdateArgs) -> QuestUpdate {
    QuestUpdate {
        content: args.title.map(|title| title.trim().to_string()),
        description: FieldUpdate::from_text(args.description, args.clear_description),
        rank: args.rank,
        points: args.points,
    }
}
