use waypoint_journey::{Progress, StepDot};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct ProgressDotsProps {
    pub progress: Option<Progress>,
}

/// Step indicator for screens inside a progress segment; renders nothing elsewhere.
#[function_component(ProgressDots)]
pub fn progress_dots(props: &ProgressDotsProps) -> Html {
    let Some(progress) = props.progress else {
        return Html::default();
    };
    let label = format!("Step {} of {}", progress.position, progress.total);
    html! {
        <ol class="progress-dots" aria-label={label.clone()}>
            { for progress.dots().into_iter().enumerate().map(|(idx, dot)| {
                let class = match dot {
                    StepDot::Done => "dot done",
                    StepDot::Current => "dot current",
                    StepDot::Upcoming => "dot upcoming",
                };
                let current = (dot == StepDot::Current).then_some("step");
                html! { <li key={idx} class={class} aria-current={current}></li> }
            }) }
            <li class="sr-only">{ label }</li>
        </ol>
    }
}
