pub mod tariff;
