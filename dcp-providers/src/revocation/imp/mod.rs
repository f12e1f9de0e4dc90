pub mod status_list;
