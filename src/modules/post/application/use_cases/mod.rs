pub mod update_question_status;
