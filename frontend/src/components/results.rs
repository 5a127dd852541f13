use super::super::Model;
use shared::Verdict;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let (Some(result), Some(panel)) = (model.controller.result(), model.controller.result_panel())
    else {
        return html! {};
    };

    let verdict_class = match result.verdict {
        Verdict::NotCancer => "not-cancer",
        Verdict::CancerOrProblematic => "cancer",
        Verdict::Unknown | Verdict::Unclassified => "unknown",
    };

    html! {
        <div class={classes!("results-container", verdict_class)}>
            <span class="result-banner">
                { format!("Success! {}", panel.message) }
            </span>
            <span class="result-details">
                { format!("Type: {}", panel.label) }
                <br />
                { format!("Confidence: {}%", panel.confidence_percent) }
                <br />
                { format!("Result: {}", panel.verdict) }
            </span>
        </div>
    }
}
