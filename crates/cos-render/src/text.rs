use cos_core::{Action, PresentationAdapter, ProofArtifact, UiNode, ValidatedSpec, WorkflowState};

/// A numbered affordance taken from an `ActionRow`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    /// 1-based, in tree order.
    pub index: usize,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub buttons: Vec<Button>,
}

impl Rendered {
    /// Forward the pressed button's action token. An index with no button
    /// forwards nothing.
    pub fn press(&self, index: usize, on_action: &mut dyn FnMut(Action)) -> Option<Action> {
        let action = self.buttons.iter().find(|b| b.index == index)?.action;
        on_action(action);
        Some(action)
    }
}

/// Plain-text adapter. Proof fields are printed as received.
pub struct TextAdapter {
    proof: Option<ProofArtifact>,
    show_proof_details: bool,
}

impl TextAdapter {
    pub fn new(proof: Option<ProofArtifact>, show_proof_details: bool) -> Self {
        Self { proof, show_proof_details }
    }

    fn node(&self, state: WorkflowState, node: &UiNode, depth: usize, out: &mut String, buttons: &mut Vec<Button>) {
        let pad = "  ".repeat(depth);
        match node {
            UiNode::StateBadge => out.push_str(&format!("{pad}[{state}]\n")),
            UiNode::ProofPanel => {
                out.push_str(&format!("{pad}== Proof ==\n"));
                self.proof_lines(&pad, out);
            }
            UiNode::HaltPanel => {
                out.push_str(&format!("{pad}== Halted ==\n"));
                match &self.proof {
                    Some(p) => out.push_str(&format!("{pad}reason: {}\n", p.reason)),
                    None => out.push_str(&format!("{pad}(no proof supplied)\n")),
                }
            }
            UiNode::Card { title, body } => {
                out.push_str(&format!("{pad}+ {title}\n"));
                for child in body {
                    self.node(state, child, depth + 1, out, buttons);
                }
            }
            UiNode::ActionRow { actions } => {
                let mut row = Vec::new();
                for action in actions {
                    let index = buttons.len() + 1;
                    buttons.push(Button { index, action: *action });
                    row.push(format!("[{index}] {}", action.label()));
                }
                out.push_str(&format!("{pad}{}\n", row.join("  ")));
            }
            UiNode::Stepper { steps } => {
                for (i, step) in steps.iter().enumerate() {
                    out.push_str(&format!("{pad}{}. {}\n", i + 1, step.title));
                    for child in &step.body {
                        self.node(state, child, depth + 1, out, buttons);
                    }
                }
            }
        }
    }

    fn proof_lines(&self, pad: &str, out: &mut String) {
        let Some(p) = &self.proof else {
            out.push_str(&format!("{pad}(no proof supplied)\n"));
            return;
        };
        if !self.show_proof_details {
            out.push_str(&format!("{pad}{} {:?}\n", p.workflow_id, p.decision));
            return;
        }
        out.push_str(&format!("{pad}workflow: {}\n", p.workflow_id));
        out.push_str(&format!(
            "{pad}decision: {:?}  rif: {}  converged: {}  structurality: {}\n",
            p.decision, p.rif, p.converged, p.structurality
        ));
        out.push_str(&format!("{pad}reason: {}\n", p.reason));
    }
}

impl PresentationAdapter for TextAdapter {
    type Output = Rendered;

    fn render(&mut self, spec: &ValidatedSpec) -> Rendered {
        let spec = spec.spec();
        let mut text = String::new();
        let mut buttons = Vec::new();
        for node in &spec.nodes {
            self.node(spec.state, node, 0, &mut text, &mut buttons);
        }
        Rendered { text, buttons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cos_core::{generate_contract, generate_ui_spec, present, Decision, Step, UiSpec, UI_SPEC_VERSION};

    fn proof() -> ProofArtifact {
        ProofArtifact::new("w1", Decision::Allow, 0, true, 90, "ok")
    }

    fn render(state: WorkflowState, details: bool) -> Rendered {
        let contract = generate_contract(state);
        let spec = generate_ui_spec(&contract, &proof(), None);
        let mut adapter = TextAdapter::new(Some(proof()), details);
        present(&mut adapter, spec, &contract).unwrap()
    }

    #[test]
    fn planned_renders_proof_and_two_buttons() {
        let r = render(WorkflowState::Planned, true);
        let expected = "[Planned]\n\
                        == Proof ==\n\
                        workflow: w1\n\
                        decision: Allow  rif: 0  converged: true  structurality: 90\n\
                        reason: ok\n\
                        + Hypersim\n  [1] Run hypersim  [2] Halt\n";
        assert_eq!(r.text, expected);
        assert_eq!(
            r.buttons,
            vec![Button { index: 1, action: Action::RunHypersim }, Button { index: 2, action: Action::Halt }]
        );
    }

    #[test]
    fn buttons_match_offered_actions() {
        for state in WorkflowState::ALL {
            let contract = generate_contract(state);
            let spec = generate_ui_spec(&contract, &proof(), None);
            let validated = ValidatedSpec::new(spec, &contract).unwrap();
            let r = TextAdapter::new(None, false).render(&validated);
            let actions: Vec<Action> = r.buttons.iter().map(|b| b.action).collect();
            assert_eq!(actions, validated.offered_actions(), "{state}");
        }
    }

    #[test]
    fn press_forwards_exact_token() {
        let r = render(WorkflowState::Converged, false);
        let mut forwarded = Vec::new();
        assert_eq!(r.press(1, &mut |a| forwarded.push(a)), Some(Action::Execute));
        assert_eq!(r.press(2, &mut |a| forwarded.push(a)), None);
        assert_eq!(forwarded, vec![Action::Execute]);
    }

    #[test]
    fn terminal_state_has_no_buttons() {
        let r = render(WorkflowState::Executed, false);
        assert!(r.buttons.is_empty());
        assert_eq!(r.text, "[Executed]\n== Proof ==\nw1 Allow\n");
    }

    #[test]
    fn malformed_proof_fields_are_shown_verbatim() {
        let contract = generate_contract(WorkflowState::Halted);
        let odd = ProofArtifact::new("w1", Decision::Halt, 7, false, 250, "");
        let spec = generate_ui_spec(&contract, &odd, None);
        let mut adapter = TextAdapter::new(Some(odd), true);
        let r = present(&mut adapter, spec, &contract).unwrap();
        assert_eq!(r.text, "[Halted]\n== Halted ==\nreason: \n");
    }

    #[test]
    fn nested_badges_render_in_tree_order() {
        let contract = generate_contract(WorkflowState::Converged);
        let spec = UiSpec {
            version: UI_SPEC_VERSION.into(),
            state: WorkflowState::Converged,
            nodes: vec![
                UiNode::card("Status", vec![UiNode::StateBadge]),
                UiNode::ActionRow { actions: vec![Action::Execute] },
                UiNode::Stepper { steps: vec![Step::new("Check", vec![UiNode::StateBadge])] },
            ],
            allowed_actions: vec![Action::Execute],
        };
        let r = present(&mut TextAdapter::new(None, false), spec, &contract).unwrap();
        assert_eq!(r.text, "+ Status\n  [Converged]\n[1] Execute\n1. Check\n  [Converged]\n");
    }
}
