use shared::{FrontDeskAction, InjuryReportDetails, ReportStatus};
use yew::prelude::*;

use crate::services::date_utils::format_report_time;

#[derive(Properties, PartialEq)]
pub struct ReportCardProps {
    pub details: InjuryReportDetails,
    pub on_action: Callback<FrontDeskAction>,
    pub on_view_memo: Callback<String>,
}

#[function_component(ReportCard)]
pub fn report_card(props: &ReportCardProps) -> Html {
    let details = &props.details;
    let report = &details.report;
    let status = ReportStatus::of(report);
    let status_class = match status {
        ReportStatus::PendingReview => "status-pending",
        ReportStatus::Reviewed => "status-reviewed",
        ReportStatus::Delivered => "status-delivered",
    };

    let on_view_memo = {
        let on_view_memo = props.on_view_memo.clone();
        let id = report.id.clone();
        Callback::from(move |_: MouseEvent| on_view_memo.emit(id.clone()))
    };

    html! {
        <div class="report-card">
            <div class="report-header">
                <h3>{details.child_display_name()}</h3>
                <span class={classes!("report-status", status_class)}>{status.label()}</span>
            </div>

            <div class="report-meta">
                <span>{format_report_time(&report.injury_timestamp)}</span>
                <span>{&report.location}</span>
                <span>{format!("Submitted by {}", details.submitter_display_name())}</span>
            </div>

            <dl class="report-body">
                <dt>{"What happened"}</dt>
                <dd>{&report.incident_description}</dd>
                <dt>{"Injury"}</dt>
                <dd>{&report.injury_description}</dd>
                <dt>{"Action taken"}</dt>
                <dd>{&report.action_taken}</dd>
                {if report.is_bite {
                    html! {
                        <>
                            <dt>{"Bitten by"}</dt>
                            <dd>{details.biter_name.as_deref().unwrap_or("Name not retrieved")}</dd>
                        </>
                    }
                } else { html! {} }}
                {if report.is_peer_aggression {
                    html! {
                        <>
                            <dt>{"Other child involved"}</dt>
                            <dd>{details.aggressor_name.as_deref().unwrap_or("Name not retrieved")}</dd>
                        </>
                    }
                } else { html! {} }}
            </dl>

            <div class="report-trail">
                <span>{format!("Reviewed: {}", details.reviewer_display_name())}</span>
                <span>{format!("Delivered: {}", details.deliverer_display_name())}</span>
                {if !report.ai_validated {
                    html! { <span class="badge">{"Not checked by assistant"}</span> }
                } else { html! {} }}
            </div>

            <div class="report-actions">
                {for FrontDeskAction::available_for(report).into_iter().map(|action| {
                    let on_action = props.on_action.clone();
                    let label = match action {
                        FrontDeskAction::MarkReviewed => "Mark Reviewed",
                        FrontDeskAction::MarkDelivered => "Mark Delivered",
                    };
                    html! {
                        <button
                            type="button"
                            class="btn btn-primary btn-small"
                            onclick={Callback::from(move |_: MouseEvent| on_action.emit(action))}
                        >
                            {label}
                        </button>
                    }
                })}
                <button type="button" class="btn btn-secondary btn-small" onclick={on_view_memo}>
                    {"View Memo"}
                </button>
            </div>
        </div>
    }
}
