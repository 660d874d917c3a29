pub mod locale_service;
