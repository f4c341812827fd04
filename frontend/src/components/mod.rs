pub mod actor_select_modal;
pub mod basic_info_section;
pub mod form_actions;
pub mod front_desk_view;
pub mod incident_flags_section;
pub mod memo_view;
pub mod narrative_section;
pub mod report_card;
pub mod suggestion_panel;
pub mod teacher_form;
