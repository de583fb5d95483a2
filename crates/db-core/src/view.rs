//! Campaign view-models.
//!
//! One tagged case per status, each producing a declarative card the UI
//! layer renders verbatim. The card owns the fixed action set for its
//! status; the DOM layer never decides what a status may do.

use crate::campaign::Campaign;
use crate::units::{eth_from_wei, format_date};
use db_api_types::{CampaignId, CampaignStatus};
use serde::{Deserialize, Serialize};

const SECS_PER_DAY: u64 = 86_400;

/// Who is looking at the card. Owners see finalize/terminate; everyone else
/// sees the voting and contribution actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Owner,
    Visitor,
}

/// The review window for voting and finalize actions on Pending/Revision
/// campaigns.
///
/// Per the product rule these actions are disabled once more than `days`
/// days have elapsed since the anchor timestamp. The default of 0 days
/// mirrors the shipped configuration even though it disables the actions
/// almost immediately; widening it is a product decision, not ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewWindow {
    pub days: u64,
}

impl Default for ReviewWindow {
    fn default() -> Self {
        ReviewWindow { days: 0 }
    }
}

impl ReviewWindow {
    pub fn allows(&self, anchor_secs: u64, now_secs: u64) -> bool {
        now_secs.saturating_sub(anchor_secs) <= self.days * SECS_PER_DAY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignAction {
    Approve,
    Disapprove,
    Finalize,
    FinalizeRevision,
    Donate,
    Report,
    Terminate,
}

impl CampaignAction {
    pub fn label(&self) -> &'static str {
        match self {
            CampaignAction::Approve => "Approve",
            CampaignAction::Disapprove => "Disapprove",
            CampaignAction::Finalize => "Finalize",
            CampaignAction::FinalizeRevision => "Finalize",
            CampaignAction::Donate => "Donate",
            CampaignAction::Report => "Report",
            CampaignAction::Terminate => "End",
        }
    }
}

/// Everything a campaign card shows, precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignCard {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub status: CampaignStatus,
    /// Status heading, e.g. `"Revision from: 2023/11/21"`.
    pub status_line: String,
    /// `YYYY/MM/DD : YYYY/MM/DD` funding period, absent for terminal
    /// statuses that hide dates (Disapproved/Banned).
    pub period: Option<String>,
    /// `"0.4 / 1 ETH"` progress, shown for Active and Ended campaigns.
    pub progress: Option<String>,
    pub actions: Vec<CampaignAction>,
}

/// Build the card for one campaign.
pub fn card(campaign: &Campaign, viewer: Viewer, window: ReviewWindow, now_secs: u64) -> CampaignCard {
    let period = format!(
        "{} : {}",
        format_date(campaign.creation_time),
        format_date(campaign.end_time())
    );
    let progress = format!(
        "{} / {} ETH",
        eth_from_wei(campaign.donated_wei),
        eth_from_wei(campaign.wei_limit)
    );
    let review_open = window.allows(campaign.review_anchor(), now_secs);

    let (status_line, period, progress, actions) = match campaign.status {
        CampaignStatus::Pending => (
            "Pending".to_owned(),
            Some(period),
            None,
            review_actions(viewer, CampaignAction::Finalize, review_open),
        ),
        CampaignStatus::Revision => (
            format!(
                "Revision from: {}",
                format_date(campaign.review_anchor())
            ),
            Some(period),
            None,
            review_actions(viewer, CampaignAction::FinalizeRevision, review_open),
        ),
        CampaignStatus::Active => (
            "Active".to_owned(),
            Some(period),
            Some(progress),
            match viewer {
                Viewer::Owner => vec![CampaignAction::Terminate],
                Viewer::Visitor => vec![CampaignAction::Donate, CampaignAction::Report],
            },
        ),
        CampaignStatus::Ended => ("Ended".to_owned(), Some(period), Some(progress), Vec::new()),
        CampaignStatus::Disapproved => ("Disapproved".to_owned(), None, None, Vec::new()),
        CampaignStatus::Banned => ("Banned".to_owned(), None, None, Vec::new()),
    };

    CampaignCard {
        id: campaign.id,
        title: campaign.title.clone(),
        description: campaign.description.clone(),
        status: campaign.status,
        status_line,
        period,
        progress,
        actions,
    }
}

fn review_actions(viewer: Viewer, owner_action: CampaignAction, review_open: bool) -> Vec<CampaignAction> {
    if !review_open {
        return Vec::new();
    }
    match viewer {
        Viewer::Owner => vec![owner_action],
        Viewer::Visitor => vec![CampaignAction::Approve, CampaignAction::Disapprove],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db_api_types::Wei;

    fn campaign(status: CampaignStatus) -> Campaign {
        Campaign {
            id: CampaignId(5),
            title: "Dragon shelter".to_owned(),
            description: "Retired dragons need homes too".to_owned(),
            creation_time: 1_700_000_000,
            week_duration: 8,
            wei_limit: Wei(1_000_000_000_000_000_000),
            donated_wei: Wei(400_000_000_000_000_000),
            status,
            revision_time: None,
        }
    }

    #[test]
    fn terminal_statuses_expose_zero_mutating_actions() {
        for status in [
            CampaignStatus::Ended,
            CampaignStatus::Disapproved,
            CampaignStatus::Banned,
        ] {
            for viewer in [Viewer::Owner, Viewer::Visitor] {
                let c = card(
                    &campaign(status),
                    viewer,
                    ReviewWindow { days: 7 },
                    1_700_000_100,
                );
                assert!(c.actions.is_empty(), "{status:?} exposed {:?}", c.actions);
            }
        }
    }

    #[test]
    fn active_campaigns_split_actions_by_viewer() {
        let owner = card(
            &campaign(CampaignStatus::Active),
            Viewer::Owner,
            ReviewWindow::default(),
            1_700_000_100,
        );
        assert_eq!(owner.actions, vec![CampaignAction::Terminate]);

        let visitor = card(
            &campaign(CampaignStatus::Active),
            Viewer::Visitor,
            ReviewWindow::default(),
            1_700_000_100,
        );
        assert_eq!(
            visitor.actions,
            vec![CampaignAction::Donate, CampaignAction::Report]
        );
        assert_eq!(visitor.progress.as_deref(), Some("0.4 / 1 ETH"));
    }

    #[test]
    fn review_window_gates_pending_and_revision_actions() {
        let window = ReviewWindow { days: 7 };
        let within = campaign(CampaignStatus::Pending).creation_time + 3 * 86_400;
        let after = campaign(CampaignStatus::Pending).creation_time + 8 * 86_400;

        let open = card(&campaign(CampaignStatus::Pending), Viewer::Owner, window, within);
        assert_eq!(open.actions, vec![CampaignAction::Finalize]);

        let closed = card(&campaign(CampaignStatus::Pending), Viewer::Owner, window, after);
        assert!(closed.actions.is_empty());

        let voting = card(&campaign(CampaignStatus::Pending), Viewer::Visitor, window, within);
        assert_eq!(
            voting.actions,
            vec![CampaignAction::Approve, CampaignAction::Disapprove]
        );
    }

    #[test]
    fn default_window_is_the_shipped_zero_days() {
        // 0 days: anything past the anchor second closes the window. This
        // mirrors the deployed configuration; see DESIGN.md before changing.
        let window = ReviewWindow::default();
        assert!(window.allows(1_700_000_000, 1_700_000_000));
        assert!(!window.allows(1_700_000_000, 1_700_000_000 + 86_401));
    }

    #[test]
    fn revision_card_names_its_anchor_date() {
        let mut c = campaign(CampaignStatus::Revision);
        c.revision_time = Some(1_700_600_000);
        let rendered = card(&c, Viewer::Owner, ReviewWindow { days: 7 }, 1_700_600_100);
        assert_eq!(rendered.status_line, "Revision from: 2023/11/21");
        assert_eq!(rendered.actions, vec![CampaignAction::FinalizeRevision]);
    }
}
