pub mod health;
pub mod import_commit;
pub mod import_upload;
