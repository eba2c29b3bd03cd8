use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::config::AppConfig;
use crate::domain::entities::history::HistoryRecord;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::ui::state::app_state::AppState;
use crate::usecase::services::history_service::HistoryService;

const CELL_STYLE: &str = "border: 1px solid #ccc; padding: 4px 8px; text-align: center;";
const INPUT_STYLE: &str = "width: 110px; padding: 4px; border: 1px solid #bbb; border-radius: 4px;";
const BUTTON_STYLE: &str =
    "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";

fn confirm(title: &str, description: &str) -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}

/// Zero renders as an empty field so the placeholder shows through.
fn input_text(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}

async fn reload_history(
    service: &HistoryService,
    mut history: Signal<Vec<HistoryRecord>>,
    mut status: Signal<String>,
) {
    match service.list_newest_first().await {
        Ok(records) => history.set(records),
        Err(err) => status.set(format!("載入歷史紀錄失敗：{err}")),
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let AppState {
        mut table,
        mut table_generation,
        history,
        mut busy,
        mut status,
    } = AppState::new();

    let service = use_signal(|| {
        HistoryService::new(Arc::new(SqliteRepo::new(config.db_path.clone())))
    });

    use_future(move || async move {
        busy.set(true);
        let svc = service();
        match svc.init().await {
            Ok(()) => reload_history(&svc, history, status).await,
            Err(err) => status.set(format!("初始化資料庫失敗：{err}")),
        }
        busy.set(false);
    });

    let view = table.read().view();
    let generation = table_generation();
    let records = history();

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 12px; display: flex; flex-direction: column; gap: 12px;",
            h2 { "鐵水元素計算" }

            table {
                style: "border-collapse: collapse; background: #fff;",
                thead {
                    tr {
                        th { style: CELL_STYLE, "序號" }
                        th { style: CELL_STYLE, "鐵水重量" }
                        th { style: CELL_STYLE, "單元素含量" }
                        th { style: CELL_STYLE, "重量×含量" }
                        th { style: CELL_STYLE, "" }
                    }
                }
                tbody {
                    {view.rows.iter().map(|row| {
                        let position = row.position;
                        let weight_text = input_text(row.weight);
                        let percent_text = input_text(row.percent);
                        let product = row.product.clone();
                        rsx!(
                            tr {
                                key: "{generation}-{position}",
                                td { style: CELL_STYLE, "{position}" }
                                td { style: CELL_STYLE,
                                    input {
                                        r#type: "number",
                                        step: "any",
                                        placeholder: "重量",
                                        style: INPUT_STYLE,
                                        value: "{weight_text}",
                                        oninput: move |event| {
                                            table.write().set_weight(position, &event.value());
                                        },
                                    }
                                }
                                td { style: CELL_STYLE,
                                    input {
                                        r#type: "number",
                                        step: "any",
                                        placeholder: "含量",
                                        style: INPUT_STYLE,
                                        value: "{percent_text}",
                                        oninput: move |event| {
                                            table.write().set_percent(position, &event.value());
                                        },
                                    }
                                    span { "%" }
                                }
                                td { style: CELL_STYLE, "{product}" }
                                td { style: CELL_STYLE,
                                    button {
                                        style: BUTTON_STYLE,
                                        onclick: move |_| {
                                            table.write().remove_entry(position);
                                            *table_generation.write() += 1;
                                        },
                                        "X"
                                    }
                                }
                            }
                        )
                    })}
                }
                tfoot {
                    tr {
                        td { style: CELL_STYLE, "合計" }
                        td { style: CELL_STYLE, "{view.total_weight}" }
                        td { style: CELL_STYLE, "" }
                        td { style: CELL_STYLE, "{view.total_element}" }
                        td { style: CELL_STYLE, "" }
                    }
                }
            }

            div {
                style: "display: flex; gap: 16px;",
                span { "總重：{view.total_weight}" }
                span { "元素量：{view.total_element}" }
                span { "佔比：{view.ratio_percent}" }
            }

            nav {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
                button {
                    style: BUTTON_STYLE,
                    onclick: move |_| {
                        table.write().add_entry(0.0, 0.0);
                    },
                    "新增一行"
                }
                button {
                    style: BUTTON_STYLE,
                    onclick: move |_| {
                        table.write().clear();
                        *table_generation.write() += 1;
                    },
                    "清空輸入"
                }
                button {
                    style: BUTTON_STYLE,
                    disabled: busy(),
                    onclick: move |_| {
                        if busy() {
                            return;
                        }
                        let entries = table.read().snapshot();
                        spawn(async move {
                            busy.set(true);
                            let svc = service();
                            match svc.save_snapshot(&entries).await {
                                Ok(id) => {
                                    status.set(format!("已保存到歷史 #{}", id.0));
                                    reload_history(&svc, history, status).await;
                                }
                                Err(err) => status.set(format!("保存失敗：{err}")),
                            }
                            busy.set(false);
                        });
                    },
                    "保存到歷史"
                }
                button {
                    style: BUTTON_STYLE,
                    disabled: busy(),
                    onclick: move |_| {
                        if busy() || !confirm("確認清空", "確認清空所有歷史紀錄？") {
                            return;
                        }
                        spawn(async move {
                            busy.set(true);
                            let svc = service();
                            match svc.clear().await {
                                Ok(()) => {
                                    status.set("已清空歷史紀錄".to_string());
                                    reload_history(&svc, history, status).await;
                                }
                                Err(err) => status.set(format!("清空失敗：{err}")),
                            }
                            busy.set(false);
                        });
                    },
                    "清空歷史"
                }
                span { "{status}" }
            }

            h3 { "歷史紀錄" }
            ul {
                style: "list-style: none; padding: 0; display: flex; flex-direction: column; gap: 10px;",
                {records.iter().map(|record| {
                    let summary = record.summary();
                    let id = record.id;
                    let entries = record.entries.clone();
                    rsx!(
                        li {
                            key: "{id.0}",
                            style: "border: 1px solid #ddd; border-radius: 8px; padding: 8px; display: flex; gap: 12px;",
                            div {
                                style: "flex: 1;",
                                strong { "{summary.saved_at}" }
                                div {
                                    "總重: {summary.total_weight} | 元素量: {summary.total_element} | 佔比: {summary.ratio_percent}"
                                }
                                table {
                                    style: "border-collapse: collapse; margin-top: 6px;",
                                    thead {
                                        tr {
                                            th { style: CELL_STYLE, "序號" }
                                            th { style: CELL_STYLE, "鐵水重量" }
                                            th { style: CELL_STYLE, "單元素含量" }
                                            th { style: CELL_STYLE, "重量×含量" }
                                        }
                                    }
                                    tbody {
                                        for detail in summary.details.iter() {
                                            tr {
                                                td { style: CELL_STYLE, "{detail.position}" }
                                                td { style: CELL_STYLE, "{detail.weight}" }
                                                td { style: CELL_STYLE, "{detail.percent}" }
                                                td { style: CELL_STYLE, "{detail.product}" }
                                            }
                                        }
                                    }
                                }
                            }
                            div {
                                style: "display: flex; flex-direction: column; gap: 6px;",
                                button {
                                    style: BUTTON_STYLE,
                                    onclick: move |_| {
                                        if !confirm("確認還原", "確認要恢復到這個歷史紀錄嗎？當前輸入的資料將被覆蓋。") {
                                            return;
                                        }
                                        table.write().replace_all(entries.clone());
                                        *table_generation.write() += 1;
                                        status.set(format!("已還原歷史 #{}", id.0));
                                    },
                                    "還原"
                                }
                                button {
                                    style: BUTTON_STYLE,
                                    disabled: busy(),
                                    onclick: move |_| {
                                        if busy() || !confirm("確認刪除", "確認要刪除這條歷史紀錄嗎？") {
                                            return;
                                        }
                                        spawn(async move {
                                            busy.set(true);
                                            let svc = service();
                                            match svc.delete(id).await {
                                                Ok(()) => reload_history(&svc, history, status).await,
                                                Err(err) => status.set(format!("刪除失敗：{err}")),
                                            }
                                            busy.set(false);
                                        });
                                    },
                                    "刪除"
                                }
                            }
                        }
                    )
                })}
            }
        }
    }
}
